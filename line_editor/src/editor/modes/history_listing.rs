// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words histlist

use crate::{EditContext, HistoryEntry, ModeState, editor::dispatch::builtins::tip_unbound};
use std::collections::HashSet;

/// Sub-state of history listing mode. `selected` indexes the filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryListingState {
    /// Newest first, without repeats.
    pub all: Vec<HistoryEntry>,
    pub filter: String,
    pub selected: usize,
}

impl HistoryListingState {
    /// `entries` oldest first, as the store returns them.
    #[must_use]
    pub fn new(entries: Vec<HistoryEntry>) -> Self {
        let mut seen = HashSet::new();
        let all = entries
            .into_iter()
            .rev()
            .filter(|it| seen.insert(it.text.clone()))
            .collect();
        Self {
            all,
            filter: String::new(),
            selected: 0,
        }
    }

    /// Entries containing the filter.
    #[must_use]
    pub fn filtered(&self) -> Vec<&HistoryEntry> {
        self.all
            .iter()
            .filter(|it| it.text.contains(&self.filter))
            .collect()
    }

    #[must_use]
    pub fn selected_line(&self) -> Option<&str> {
        self.filtered()
            .get(self.selected)
            .map(|it| it.text.as_str())
    }

    pub fn select_prev(&mut self) { self.selected = self.selected.saturating_sub(1); }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.filtered().len() {
            self.selected += 1;
        }
    }

    pub fn push_filter(&mut self, ch: char) {
        self.filter.push(ch);
        self.selected = 0;
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }
}

pub(crate) fn start_history_listing(ctx: &mut EditContext<'_>) {
    let listing = HistoryListingState::new(ctx.history.all_commands());
    if listing.all.is_empty() {
        ctx.state.add_tip("history is empty");
        return;
    }
    ctx.state.mode = ModeState::HistoryListing(listing);
}

fn with_listing(ctx: &mut EditContext<'_>, f: impl FnOnce(&mut HistoryListingState)) {
    if let ModeState::HistoryListing(listing) = &mut ctx.state.mode {
        f(listing);
    }
}

pub(crate) fn select_histlist_prev(ctx: &mut EditContext<'_>) {
    with_listing(ctx, HistoryListingState::select_prev);
}

pub(crate) fn select_histlist_next(ctx: &mut EditContext<'_>) {
    with_listing(ctx, HistoryListingState::select_next);
}

pub(crate) fn histlist_append_filter(ctx: &mut EditContext<'_>) {
    match ctx.state.last_key.and_then(|it| it.printable_char()) {
        Some(ch) => with_listing(ctx, |it| it.push_filter(ch)),
        None => tip_unbound(ctx.state),
    }
}

pub(crate) fn histlist_backspace(ctx: &mut EditContext<'_>) {
    with_listing(ctx, HistoryListingState::pop_filter);
}

/// Does nothing unless the listing is showing.
pub(crate) fn accept_histlist(ctx: &mut EditContext<'_>) {
    if !matches!(ctx.state.mode, ModeState::HistoryListing(_)) {
        return;
    }
    let ModeState::HistoryListing(listing) = std::mem::take(&mut ctx.state.mode) else {
        return;
    };
    if let Some(line) = listing.selected_line() {
        ctx.state.insert_at_dot(line);
    }
}

pub(crate) fn cancel_histlist(ctx: &mut EditContext<'_>) {
    ctx.state.mode = ModeState::Insert;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditorState, HistoryStore, InMemoryHistory, ModifierKeysMask, SpecialKey,
                editor::dispatch::builtins::test_support::run_builtins_with_history,
                keypress};
    use pretty_assertions::assert_eq;

    fn history() -> InMemoryHistory {
        let it = InMemoryHistory::default();
        for line in ["make", "cargo build", "make", "cargo test"] {
            it.append(line).unwrap();
        }
        it
    }

    fn listing(state: &EditorState) -> &HistoryListingState {
        match &state.mode {
            ModeState::HistoryListing(it) => it,
            other => panic!("not listing history: {other:?}"),
        }
    }

    fn type_filter(state: &mut EditorState, history: &InMemoryHistory, text: &str) {
        for ch in text.chars() {
            state.last_key = Some(keypress!(@char ch));
            run_builtins_with_history(state, history, &["histlist-append-filter"]);
        }
    }

    #[test]
    fn test_listing_is_newest_first_without_repeats() {
        let history = history();
        let mut state = EditorState::new_active();

        run_builtins_with_history(&mut state, &history, &["start-history-listing"]);

        let texts: Vec<_> = listing(&state).all.iter().map(|it| it.text.as_str()).collect();
        assert_eq!(texts, vec!["cargo test", "make", "cargo build"]);
    }

    #[test]
    fn test_filter_select_and_accept() {
        let history = history();
        let mut state = EditorState::new_active();
        state.set_buffer("time ");

        run_builtins_with_history(&mut state, &history, &["start-history-listing"]);
        type_filter(&mut state, &history, "cargo");
        run_builtins_with_history(&mut state, &history, &["select-histlist-next"]);
        assert_eq!(listing(&state).selected_line(), Some("cargo build"));

        run_builtins_with_history(&mut state, &history, &["accept-histlist"]);
        assert_eq!(state.buffer, "time cargo build");
        assert_eq!(state.mode, ModeState::Insert);
    }

    #[test]
    fn test_backspace_and_unprintable_keys() {
        let history = history();
        let mut state = EditorState::new_active();
        run_builtins_with_history(&mut state, &history, &["start-history-listing"]);
        type_filter(&mut state, &history, "mx");
        assert!(listing(&state).filtered().is_empty());

        run_builtins_with_history(&mut state, &history, &["histlist-backspace"]);
        assert_eq!(listing(&state).filter, "m");
        assert_eq!(listing(&state).selected_line(), Some("make"));

        state.last_key = Some(keypress!(
            @special ModifierKeysMask::new().with_ctrl(), SpecialKey::Left
        ));
        run_builtins_with_history(&mut state, &history, &["histlist-append-filter"]);
        assert_eq!(state.tips, vec!["Unbound: Ctrl-Left".to_string()]);

        run_builtins_with_history(&mut state, &history, &["cancel-histlist"]);
        assert_eq!(state.mode, ModeState::Insert);
        assert!(state.buffer.is_empty());
    }

    #[test]
    fn test_accept_outside_listing_keeps_mode() {
        let history = history();
        let dir = crate::try_create_temp_dir().unwrap();
        let navigating = ModeState::Navigation(
            crate::NavigationState::try_new(dir.inner.clone()).unwrap(),
        );

        for mode in [navigating, ModeState::Command] {
            let mut state = EditorState::new_active();
            state.set_buffer("ls");
            state.mode = mode.clone();

            run_builtins_with_history(&mut state, &history, &["accept-histlist"]);

            assert_eq!(state.mode, mode);
            assert_eq!(state.buffer, "ls");
        }
    }

    #[test]
    fn test_empty_history_gives_tip() {
        let history = InMemoryHistory::default();
        let mut state = EditorState::new_active();

        run_builtins_with_history(&mut state, &history, &["start-history-listing"]);

        assert_eq!(state.mode, ModeState::Insert);
        assert_eq!(state.tips, vec!["history is empty".to_string()]);
    }
}
