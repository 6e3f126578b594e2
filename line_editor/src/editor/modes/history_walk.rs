// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EditContext, HistoryEntry, ModeState, NextAction};

/// Sub-state of history mode: walking through the entries that start with `prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryWalkState {
    pub prefix: String,
    /// Sequence number of the entry shown.
    pub seq: i64,
    /// Text of the entry shown.
    pub line: String,
}

impl HistoryWalkState {
    fn show(&mut self, entry: HistoryEntry) {
        self.seq = entry.seq;
        self.line = entry.text;
    }
}

pub(crate) fn start_history(ctx: &mut EditContext<'_>) {
    let prefix = ctx.state.buffer[..ctx.state.dot].to_string();
    let before_seq = if ctx.state.history_seq < 0 {
        i64::MAX
    } else {
        ctx.state.history_seq
    };
    match ctx.history.last_command(before_seq, &prefix) {
        Some(entry) => {
            ctx.state.mode = ModeState::History(HistoryWalkState {
                prefix,
                seq: entry.seq,
                line: entry.text,
            });
        }
        None => ctx.state.add_tip("no matching history item"),
    }
}

pub(crate) fn select_history_prev(ctx: &mut EditContext<'_>) {
    walk(ctx, |ctx, walk| ctx.history.last_command(walk.seq, &walk.prefix));
}

pub(crate) fn select_history_next(ctx: &mut EditContext<'_>) {
    walk(ctx, |ctx, walk| ctx.history.next_command(walk.seq, &walk.prefix));
}

fn walk(
    ctx: &mut EditContext<'_>,
    find: impl FnOnce(&EditContext<'_>, &HistoryWalkState) -> Option<HistoryEntry>,
) {
    let ModeState::History(walk) = &ctx.state.mode else {
        return;
    };
    match find(ctx, walk) {
        Some(entry) => {
            if let ModeState::History(walk) = &mut ctx.state.mode {
                walk.show(entry);
            }
        }
        None => ctx.state.add_tip("no more matching history items"),
    }
}

/// Take over the line shown, then let the key act on it in insert mode.
pub(crate) fn default_history(ctx: &mut EditContext<'_>) {
    if !matches!(ctx.state.mode, ModeState::History(_)) {
        return;
    }
    if let ModeState::History(walk) = std::mem::take(&mut ctx.state.mode) {
        ctx.state.set_buffer(walk.line);
    }
    ctx.state.set_next_action(NextAction::ReprocessKey);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditorState, HistoryStore, InMemoryHistory,
                editor::dispatch::builtins::test_support::run_builtins_with_history};
    use pretty_assertions::assert_eq;

    fn history() -> InMemoryHistory {
        let it = InMemoryHistory::default();
        for line in ["ls -l", "echo one", "ls /tmp", "echo two"] {
            it.append(line).unwrap();
        }
        it
    }

    fn shown(state: &EditorState) -> (&str, i64) {
        match &state.mode {
            ModeState::History(walk) => (walk.line.as_str(), walk.seq),
            other => panic!("not in history mode: {other:?}"),
        }
    }

    #[test]
    fn test_walk_matches_prefix_before_dot() {
        let history = history();
        let mut state = EditorState::new_active();
        state.set_buffer("ls");

        run_builtins_with_history(&mut state, &history, &["start-history"]);
        assert_eq!(shown(&state), ("ls /tmp", 3));

        run_builtins_with_history(&mut state, &history, &["select-history-prev"]);
        assert_eq!(shown(&state), ("ls -l", 1));

        run_builtins_with_history(&mut state, &history, &["select-history-prev"]);
        assert_eq!(shown(&state), ("ls -l", 1));
        assert_eq!(state.tips, vec!["no more matching history items".to_string()]);

        run_builtins_with_history(&mut state, &history, &["select-history-next"]);
        assert_eq!(shown(&state), ("ls /tmp", 3));
    }

    #[test]
    fn test_walk_stops_at_session_sequence_number() {
        let history = history();
        let mut state = EditorState::new_active();
        state.history_seq = 3;

        run_builtins_with_history(&mut state, &history, &["start-history"]);

        assert_eq!(shown(&state), ("echo one", 2));
    }

    #[test]
    fn test_no_match_gives_tip() {
        let history = history();
        let mut state = EditorState::new_active();
        state.set_buffer("git");

        run_builtins_with_history(&mut state, &history, &["start-history"]);

        assert_eq!(state.mode, ModeState::Insert);
        assert_eq!(state.tips, vec!["no matching history item".to_string()]);
    }

    #[test]
    fn test_default_history_adopts_line() {
        let history = history();
        let mut state = EditorState::new_active();

        run_builtins_with_history(&mut state, &history, &["start-history", "default-history"]);

        assert_eq!(state.buffer, "echo two");
        assert_eq!(state.dot, "echo two".len());
        assert_eq!(state.mode, ModeState::Insert);
        assert!(matches!(state.take_next_action(), NextAction::ReprocessKey));
    }

    #[test]
    fn test_default_history_outside_walk_does_nothing() {
        let history = history();
        let mut state = EditorState::new_active();
        state.set_buffer("ls");
        state.mode = ModeState::Command;

        run_builtins_with_history(&mut state, &history, &["default-history"]);

        assert_eq!(state.mode, ModeState::Command);
        assert_eq!(state.buffer, "ls");
        assert!(matches!(state.take_next_action(), NextAction::NoAction));
    }
}
