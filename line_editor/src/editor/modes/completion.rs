// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EditContext, EditorState, ModeState, NextAction, SHELL_BUILTINS, Span};
use miette::IntoDiagnostic;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Candidate {
    /// Spliced into the buffer when accepted.
    pub text: String,
    /// Shown in the candidate list.
    pub display: String,
}

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            display: text.clone(),
            text,
        }
    }
}

/// Sub-state of completion mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionState {
    pub candidates: Vec<Candidate>,
    pub selected: usize,
    /// The part of the buffer the accepted candidate replaces.
    pub span: Span,
}

impl CompletionState {
    #[must_use]
    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.selected)
    }

    pub fn select_prev(&mut self) {
        let len = self.candidates.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_next(&mut self) {
        let len = self.candidates.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }
}

/// Produces completion candidates for the word under the dot.
pub trait Completer: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when candidates can't be listed, eg: an unreadable directory.
    fn complete(&self, state: &EditorState) -> miette::Result<CompletionState>;
}

/// Completes command names in head position and file names everywhere else.
#[derive(Debug, Clone)]
pub struct DefaultCompleter {
    pub builtin_commands: Vec<String>,
}

impl Default for DefaultCompleter {
    fn default() -> Self {
        Self {
            builtin_commands: SHELL_BUILTINS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Byte offset where the word ending at the dot starts.
fn word_start(state: &EditorState) -> usize {
    state.buffer[..state.dot]
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace() || matches!(ch, '|' | ';'))
        .map_or(0, |(index, ch)| index + ch.len_utf8())
}

/// Whether the word starting at `begin` is the first word of a form.
fn is_head_position(buffer: &str, begin: usize) -> bool {
    let before = buffer[..begin].trim_end();
    before.is_empty() || before.ends_with('|') || before.ends_with(';')
}

impl DefaultCompleter {
    fn complete_command(&self, state: &EditorState, prefix: &str) -> Vec<Candidate> {
        let mut names: Vec<&str> = state
            .is_external
            .iter()
            .map(String::as_str)
            .chain(self.builtin_commands.iter().map(String::as_str))
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter().map(Candidate::new).collect()
    }

    fn complete_file(prefix: &str) -> miette::Result<Vec<Candidate>> {
        let (dir_part, file_prefix) = match prefix.rfind('/') {
            Some(index) => prefix.split_at(index + 1),
            None => ("", prefix),
        };
        let dir_to_read = match dir_part {
            "" => PathBuf::from("."),
            _ => match dir_part.strip_prefix("~/") {
                Some(rest) => dirs::home_dir().unwrap_or_default().join(rest),
                None => PathBuf::from(dir_part),
            },
        };

        let mut acc = vec![];
        for entry in std::fs::read_dir(&dir_to_read).into_diagnostic()? {
            let entry = entry.into_diagnostic()?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(file_prefix) {
                continue;
            }
            if name.starts_with('.') && !file_prefix.starts_with('.') {
                continue;
            }
            let is_dir = entry.path().is_dir();
            let text = format!("{dir_part}{name}{}", if is_dir { "/" } else { "" });
            acc.push(Candidate {
                display: format!("{name}{}", if is_dir { "/" } else { "" }),
                text,
            });
        }
        acc.sort_by(|a, b| a.text.cmp(&b.text));
        Ok(acc)
    }
}

impl Completer for DefaultCompleter {
    fn complete(&self, state: &EditorState) -> miette::Result<CompletionState> {
        let begin = word_start(state);
        let prefix = &state.buffer[begin..state.dot];
        let candidates = if is_head_position(&state.buffer, begin) && !prefix.contains('/')
        {
            self.complete_command(state, prefix)
        } else {
            Self::complete_file(prefix)?
        };
        Ok(CompletionState {
            candidates,
            selected: 0,
            span: Span::new(begin, state.dot),
        })
    }
}

/// Splice the selected candidate over its span and go back to insert mode. An out of
/// range selection leaves the buffer alone, the completion state is dropped either way.
/// Returns `false`, touching nothing, when not completing.
pub fn accept_completion(state: &mut EditorState) -> bool {
    if !matches!(state.mode, ModeState::Completion(_)) {
        return false;
    }
    let ModeState::Completion(completion) = std::mem::take(&mut state.mode) else {
        return false;
    };
    if let Some(candidate) = completion.selected_candidate() {
        let Span { begin, end } = completion.span;
        if begin <= end && end <= state.buffer.len() {
            state.buffer.replace_range(begin..end, &candidate.text);
            state.dot = begin + candidate.text.len();
        }
    }
    true
}

pub(crate) fn start_completion(ctx: &mut EditContext<'_>) {
    let completion = match ctx.completer.complete(ctx.state) {
        Ok(it) => it,
        Err(err) => {
            tracing::debug!(message = "completion failed", ?err);
            ctx.state.add_tip(format!("completion error: {err}"));
            return;
        }
    };
    match completion.candidates.len() {
        0 => ctx.state.add_tip("no candidates"),
        1 => {
            ctx.state.mode = ModeState::Completion(completion);
            accept_completion(ctx.state);
        }
        _ => ctx.state.mode = ModeState::Completion(completion),
    }
}

fn with_completion(ctx: &mut EditContext<'_>, f: impl FnOnce(&mut CompletionState)) {
    if let ModeState::Completion(completion) = &mut ctx.state.mode {
        f(completion);
    }
}

pub(crate) fn select_cand_prev(ctx: &mut EditContext<'_>) {
    with_completion(ctx, CompletionState::select_prev);
}

pub(crate) fn select_cand_next(ctx: &mut EditContext<'_>) {
    with_completion(ctx, CompletionState::select_next);
}

pub(crate) fn accept_completion_builtin(ctx: &mut EditContext<'_>) {
    accept_completion(ctx.state);
}

pub(crate) fn cancel_completion(ctx: &mut EditContext<'_>) {
    ctx.state.mode = ModeState::Insert;
}

pub(crate) fn default_completion(ctx: &mut EditContext<'_>) {
    if accept_completion(ctx.state) {
        ctx.state.set_next_action(NextAction::ReprocessKey);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{editor::dispatch::builtins::test_support::run_builtins, try_create_temp_dir};
    use pretty_assertions::assert_eq;

    fn completing(buffer: &str, candidates: &[&str], span: Span) -> EditorState {
        let mut state = EditorState::new_active();
        state.set_buffer(buffer);
        state.mode = ModeState::Completion(CompletionState {
            candidates: candidates.iter().map(|it| Candidate::new(*it)).collect(),
            selected: 0,
            span,
        });
        state
    }

    #[test]
    fn test_accept_splices_candidate_over_span() {
        let mut state = completing("echo fo", &["foo"], Span::new(5, 7));

        accept_completion(&mut state);

        assert_eq!(state.buffer, "echo foo");
        assert_eq!(state.dot, 8);
        assert_eq!(state.mode, ModeState::Insert);
    }

    #[test]
    fn test_accept_with_out_of_range_selection_only_clears() {
        let mut state = completing("echo fo", &["foo"], Span::new(5, 7));
        if let ModeState::Completion(completion) = &mut state.mode {
            completion.selected = 3;
        }

        accept_completion(&mut state);

        assert_eq!(state.buffer, "echo fo");
        assert_eq!(state.dot, 7);
        assert_eq!(state.mode, ModeState::Insert);
    }

    #[test]
    fn test_selection_wraps() {
        let mut state = completing("x", &["a", "b", "c"], Span::new(0, 1));
        run_builtins(&mut state, &["select-cand-prev"]);
        let ModeState::Completion(completion) = &state.mode else {
            panic!("not completing");
        };
        assert_eq!(completion.selected, 2);

        run_builtins(&mut state, &["select-cand-next", "accept-completion"]);
        assert_eq!(state.buffer, "a");
    }

    #[test]
    fn test_default_completion_accepts_and_reprocesses() {
        let mut state = completing("ls fo", &["foo", "fob"], Span::new(3, 5));
        run_builtins(&mut state, &["default-completion"]);
        assert_eq!(state.buffer, "ls foo");
        assert!(matches!(state.take_next_action(), NextAction::ReprocessKey));
    }

    #[test]
    fn test_accept_outside_completion_keeps_mode() {
        let mut state = EditorState::new_active();
        state.set_buffer("ls fo");
        state.mode = ModeState::Command;

        run_builtins(&mut state, &["accept-completion", "default-completion"]);

        assert_eq!(state.mode, ModeState::Command);
        assert_eq!(state.buffer, "ls fo");
        assert!(matches!(state.take_next_action(), NextAction::NoAction));
    }

    #[test]
    fn test_cancel_keeps_buffer() {
        let mut state = completing("ls fo", &["foo", "fob"], Span::new(3, 5));
        run_builtins(&mut state, &["cancel-completion"]);
        assert_eq!(state.buffer, "ls fo");
        assert_eq!(state.mode, ModeState::Insert);
    }

    #[test]
    fn test_command_candidates_in_head_position() {
        let mut state = EditorState::new_active();
        state.is_external.insert("lsblk".into());
        state.is_external.insert("echo".into());
        state.set_buffer("cat x | ec");
        let completer = DefaultCompleter {
            builtin_commands: vec!["echo".into(), "exit".into()],
        };

        let completion = completer.complete(&state).unwrap();

        assert_eq!(completion.candidates, vec![Candidate::new("echo")]);
        assert_eq!(completion.span, Span::new(8, 10));
    }

    #[test]
    fn test_file_candidates_keep_dir_and_mark_dirs() {
        let dir = try_create_temp_dir().unwrap();
        std::fs::write(dir.join("foo.txt"), "").unwrap();
        std::fs::create_dir(dir.join("folder")).unwrap();
        std::fs::write(dir.join(".fog"), "").unwrap();
        std::fs::write(dir.join("bar"), "").unwrap();
        let mut state = EditorState::new_active();
        state.set_buffer(format!("cat {dir}/fo"));

        let completion = DefaultCompleter::default().complete(&state).unwrap();

        let texts: Vec<_> = completion.candidates.iter().map(|it| it.text.clone()).collect();
        assert_eq!(texts, vec![format!("{dir}/folder/"), format!("{dir}/foo.txt")]);
        assert_eq!(completion.candidates[0].display, "folder/");
        assert_eq!(completion.span.begin, 4);
    }

    #[test]
    fn test_start_completion_single_candidate_is_accepted() {
        let dir = try_create_temp_dir().unwrap();
        std::fs::write(dir.join("only.txt"), "").unwrap();
        let mut state = EditorState::new_active();
        state.set_buffer(format!("cat {dir}/on"));

        run_builtins(&mut state, &["start-completion"]);

        assert_eq!(state.buffer, format!("cat {dir}/only.txt"));
        assert_eq!(state.dot, state.buffer.len());
        assert_eq!(state.mode, ModeState::Insert);
    }

    #[test]
    fn test_start_completion_without_candidates_gives_tip() {
        let dir = try_create_temp_dir().unwrap();
        let mut state = EditorState::new_active();
        state.set_buffer(format!("cat {dir}/zz"));

        run_builtins(&mut state, &["start-completion"]);

        assert_eq!(state.tips, vec!["no candidates".to_string()]);
        assert_eq!(state.mode, ModeState::Insert);
    }
}
