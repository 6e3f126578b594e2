// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words histlist

use crate::{CompletionState, HistoryListingState, HistoryWalkState, LineEditorError,
            NavigationState};

/// The editor modes. Each one has its own [`crate::BindingTable`]. The string form
/// (`insert`, `history_listing`, ...) names the table in [`crate::EditorModule`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    Insert,
    Command,
    Completion,
    Navigation,
    History,
    HistoryListing,
}

/// The current mode together with the sub-state only that mode owns. Leaving a mode
/// drops its sub-state, so there is never more than one of them around.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModeState {
    #[default]
    Insert,
    Command,
    Completion(CompletionState),
    Navigation(NavigationState),
    History(HistoryWalkState),
    HistoryListing(HistoryListingState),
}

impl ModeState {
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            ModeState::Insert => Mode::Insert,
            ModeState::Command => Mode::Command,
            ModeState::Completion(_) => Mode::Completion,
            ModeState::Navigation(_) => Mode::Navigation,
            ModeState::History(_) => Mode::History,
            ModeState::HistoryListing(_) => Mode::HistoryListing,
        }
    }
}

/// The result of [`crate::Editor::read_line`].
#[derive(Debug)]
pub enum LineRead {
    Line(String),
    Eof,
    Error(LineEditorError),
}

impl LineRead {
    /// The only kind of result that is recorded in history.
    #[must_use]
    pub fn is_non_empty_line(&self) -> bool {
        matches!(self, LineRead::Line(line) if !line.is_empty())
    }
}

/// What the dispatcher does after a binding returns.
#[derive(Debug, Default)]
pub enum NextAction {
    /// Render, then wait for the next event.
    #[default]
    NoAction,
    /// Look up the same key again, in whatever mode is now current.
    ReprocessKey,
    /// End the read with this result.
    ExitWithResult(LineRead),
}
