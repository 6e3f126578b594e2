// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words histlist

use super::EditContext;
use crate::{EditorState, LineRead, ModeState, NextAction,
            editor::modes::{completion, history_listing, history_walk, navigation}};
use std::fmt::{Debug, Formatter};

pub type BuiltinFn = fn(&mut EditContext<'_>);

/// A named editor action that takes no arguments.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub imp: BuiltinFn,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<editor builtin {}>", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool { self.name == other.name }
}

impl Eq for Builtin {}

macro_rules! builtin {
    ($name:literal, $imp:path) => {
        Builtin {
            name: $name,
            imp: $imp,
        }
    };
}

pub static BUILTINS: &[Builtin] = &[
    // Modes.
    builtin!("start-insert", start_insert),
    builtin!("start-command", start_command),
    builtin!("default-insert", default_insert),
    builtin!("default-command", default_command),
    // Moving the dot.
    builtin!("move-dot-left", move_dot_left),
    builtin!("move-dot-right", move_dot_right),
    builtin!("move-dot-left-word", move_dot_left_word),
    builtin!("move-dot-right-word", move_dot_right_word),
    builtin!("move-dot-sol", move_dot_sol),
    builtin!("move-dot-eol", move_dot_eol),
    // Killing text.
    builtin!("kill-rune-left", kill_rune_left),
    builtin!("kill-rune-right", kill_rune_right),
    builtin!("kill-word-left", kill_word_left),
    builtin!("kill-line-left", kill_line_left),
    builtin!("kill-line-right", kill_line_right),
    // Ending the read.
    builtin!("return-line", return_line),
    builtin!("return-eof", return_eof),
    builtin!("return-eof-or-kill-rune-right", return_eof_or_kill_rune_right),
    builtin!("redraw", redraw),
    // Completion.
    builtin!("start-completion", completion::start_completion),
    builtin!("select-cand-prev", completion::select_cand_prev),
    builtin!("select-cand-next", completion::select_cand_next),
    builtin!("accept-completion", completion::accept_completion_builtin),
    builtin!("cancel-completion", completion::cancel_completion),
    builtin!("default-completion", completion::default_completion),
    // Navigation.
    builtin!("start-navigation", navigation::start_navigation),
    builtin!("select-nav-prev", navigation::select_nav_prev),
    builtin!("select-nav-next", navigation::select_nav_next),
    builtin!("ascend-nav", navigation::ascend_nav),
    builtin!("descend-nav", navigation::descend_nav),
    builtin!("navigation-insert-selected", navigation::navigation_insert_selected),
    builtin!("quit-navigation", navigation::quit_navigation),
    builtin!("default-navigation", navigation::default_navigation),
    // History.
    builtin!("start-history", history_walk::start_history),
    builtin!("select-history-prev", history_walk::select_history_prev),
    builtin!("select-history-next", history_walk::select_history_next),
    builtin!("default-history", history_walk::default_history),
    // History listing.
    builtin!("start-history-listing", history_listing::start_history_listing),
    builtin!("select-histlist-prev", history_listing::select_histlist_prev),
    builtin!("select-histlist-next", history_listing::select_histlist_next),
    builtin!("histlist-append-filter", history_listing::histlist_append_filter),
    builtin!("histlist-backspace", history_listing::histlist_backspace),
    builtin!("accept-histlist", history_listing::accept_histlist),
    builtin!("cancel-histlist", history_listing::cancel_histlist),
];

#[must_use]
pub fn find_builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|it| it.name == name)
}

/// Tip for a key that the current mode does nothing with.
pub(crate) fn tip_unbound(state: &mut EditorState) {
    let key = state
        .last_key
        .map(|it| it.to_string())
        .unwrap_or_default();
    state.add_tip(format!("Unbound: {key}"));
}

fn start_insert(ctx: &mut EditContext<'_>) { ctx.state.mode = ModeState::Insert; }

fn start_command(ctx: &mut EditContext<'_>) { ctx.state.mode = ModeState::Command; }

/// Insert the key that was pressed, if it is printable.
fn default_insert(ctx: &mut EditContext<'_>) {
    match ctx.state.last_key.and_then(|it| it.printable_char()) {
        Some(ch) => ctx.state.insert_at_dot(ch.encode_utf8(&mut [0; 4])),
        None => tip_unbound(ctx.state),
    }
}

fn default_command(ctx: &mut EditContext<'_>) { tip_unbound(ctx.state); }

fn move_dot_left(ctx: &mut EditContext<'_>) {
    ctx.state.dot = ctx.state.prev_grapheme_boundary();
}

fn move_dot_right(ctx: &mut EditContext<'_>) {
    ctx.state.dot = ctx.state.next_grapheme_boundary();
}

fn move_dot_left_word(ctx: &mut EditContext<'_>) {
    ctx.state.dot = ctx.state.prev_word_start();
}

fn move_dot_right_word(ctx: &mut EditContext<'_>) {
    ctx.state.dot = ctx.state.next_word_start();
}

fn start_of_line(state: &EditorState) -> usize {
    state.buffer[..state.dot].rfind('\n').map_or(0, |it| it + 1)
}

fn end_of_line(state: &EditorState) -> usize {
    state.buffer[state.dot..]
        .find('\n')
        .map_or(state.buffer.len(), |it| state.dot + it)
}

fn move_dot_sol(ctx: &mut EditContext<'_>) { ctx.state.dot = start_of_line(ctx.state); }

fn move_dot_eol(ctx: &mut EditContext<'_>) { ctx.state.dot = end_of_line(ctx.state); }

fn kill_rune_left(ctx: &mut EditContext<'_>) {
    let begin = ctx.state.prev_grapheme_boundary();
    ctx.state.kill_range(begin, ctx.state.dot);
}

fn kill_rune_right(ctx: &mut EditContext<'_>) {
    let end = ctx.state.next_grapheme_boundary();
    ctx.state.kill_range(ctx.state.dot, end);
}

fn kill_word_left(ctx: &mut EditContext<'_>) {
    let begin = ctx.state.prev_word_start();
    ctx.state.kill_range(begin, ctx.state.dot);
}

fn kill_line_left(ctx: &mut EditContext<'_>) {
    let begin = start_of_line(ctx.state);
    ctx.state.kill_range(begin, ctx.state.dot);
}

fn kill_line_right(ctx: &mut EditContext<'_>) {
    let end = end_of_line(ctx.state);
    ctx.state.kill_range(ctx.state.dot, end);
}

fn return_line(ctx: &mut EditContext<'_>) {
    let line = ctx.state.buffer.clone();
    ctx.state
        .set_next_action(NextAction::ExitWithResult(LineRead::Line(line)));
}

fn return_eof(ctx: &mut EditContext<'_>) {
    ctx.state
        .set_next_action(NextAction::ExitWithResult(LineRead::Eof));
}

fn return_eof_or_kill_rune_right(ctx: &mut EditContext<'_>) {
    if ctx.state.buffer.is_empty() {
        return_eof(ctx);
    } else {
        kill_rune_right(ctx);
    }
}

fn redraw(ctx: &mut EditContext<'_>) { ctx.state.force_full_redraw = true; }
