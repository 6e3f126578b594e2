// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios

use std::{fmt::Write as _, io};

/// Failures of the terminal attribute round trip performed by
/// [`crate::TerminalSession`]. All three are fatal to the current read.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TerminalAttributeError {
    #[error("can't get terminal attribute")]
    #[diagnostic(
        code(r3bl_line_editor::terminal::read_attributes),
        help("Make sure stdin or /dev/tty refers to a terminal")
    )]
    Read(#[source] io::Error),

    #[error("can't set up terminal attribute")]
    #[diagnostic(
        code(r3bl_line_editor::terminal::apply_attributes),
        help("The terminal refused raw mode (canonical off, echo off, VMIN=1, VTIME=0)")
    )]
    Apply(#[source] io::Error),

    #[error("can't restore terminal attribute")]
    #[diagnostic(
        code(r3bl_line_editor::terminal::restore_attributes),
        help("Run `stty sane` to recover the terminal")
    )]
    Restore(#[source] io::Error),
}

/// Errors that abort a [`crate::Editor::read_line`] call. They are handed back to the
/// caller as [`crate::LineRead::Error`].
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LineEditorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    TerminalAttribute(#[from] TerminalAttributeError),

    #[error("failed to render the line")]
    #[diagnostic(code(r3bl_line_editor::render))]
    Render(#[source] io::Error),

    #[error("all event sources closed")]
    #[diagnostic(
        code(r3bl_line_editor::event_sources_closed),
        help("The input stream ended, no more keys can arrive")
    )]
    EventSourcesClosed,

    /// More than one failure happened on the way out, eg: the read failed and then the
    /// terminal could not be restored either.
    #[error("{}", join_messages(.0))]
    #[diagnostic(code(r3bl_line_editor::multiple))]
    Multiple(#[related] Vec<LineEditorError>),
}

impl LineEditorError {
    /// `self` followed by `other`. Nested [`LineEditorError::Multiple`] values are
    /// flattened.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        let mut acc = vec![];
        for it in [self, other] {
            match it {
                LineEditorError::Multiple(inner) => acc.extend(inner),
                other => acc.push(other),
            }
        }
        LineEditorError::Multiple(acc)
    }

    /// Combine two optional errors so that neither one is dropped.
    #[must_use]
    pub fn aggregate(first: Option<Self>, second: Option<Self>) -> Option<Self> {
        match (first, second) {
            (None, None) => None,
            (Some(it), None) | (None, Some(it)) => Some(it),
            (Some(first), Some(second)) => Some(first.combine(second)),
        }
    }
}

fn join_messages(errors: &[LineEditorError]) -> String {
    let mut acc = String::from("multiple errors:");
    for (index, error) in errors.iter().enumerate() {
        let separator = if index == 0 { " " } else { "; " };
        _ = write!(acc, "{separator}{error}");
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restore_error() -> LineEditorError {
        TerminalAttributeError::Restore(io::Error::other("EIO")).into()
    }

    #[test]
    fn test_aggregate_keeps_single_error() {
        let it = LineEditorError::aggregate(None, Some(restore_error())).unwrap();
        assert!(matches!(
            it,
            LineEditorError::TerminalAttribute(TerminalAttributeError::Restore(_))
        ));
        assert!(LineEditorError::aggregate(None, None).is_none());
    }

    #[test]
    fn test_aggregate_keeps_both_errors_in_order() {
        let it = LineEditorError::aggregate(
            Some(LineEditorError::EventSourcesClosed),
            Some(restore_error()),
        )
        .unwrap();
        let LineEditorError::Multiple(inner) = &it else {
            panic!("expected multiple errors, got {it:?}");
        };
        assert_eq!(inner.len(), 2);
        assert!(matches!(inner[0], LineEditorError::EventSourcesClosed));
        pretty_assertions::assert_eq!(
            it.to_string(),
            "multiple errors: all event sources closed; can't restore terminal attribute"
        );
    }

    #[test]
    fn test_aggregate_flattens_nested() {
        let nested = LineEditorError::aggregate(
            Some(LineEditorError::EventSourcesClosed),
            Some(restore_error()),
        );
        let it = LineEditorError::aggregate(nested, Some(restore_error())).unwrap();
        let LineEditorError::Multiple(inner) = it else {
            panic!("expected multiple errors");
        };
        assert_eq!(inner.len(), 3);
    }
}
