// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::Span;

/// A parse or compile error reported by a [`crate::Parser`] or [`crate::Compiler`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum AnalysisError {
    #[error("{message}")]
    #[diagnostic(code(r3bl_line_editor::analysis::at))]
    At { message: String, span: Span },

    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    #[diagnostic(code(r3bl_line_editor::analysis::many))]
    Many(Vec<AnalysisError>),

    #[error("{0}")]
    #[diagnostic(code(r3bl_line_editor::analysis::unpositioned))]
    Unpositioned(String),
}

impl AnalysisError {
    #[must_use]
    pub fn at(message: impl Into<String>, span: Span) -> Self {
        AnalysisError::At {
            message: message.into(),
            span,
        }
    }

    /// Whether every part of this error is positioned exactly at `offset`. An error
    /// without a position is never at the end.
    #[must_use]
    pub fn is_at(&self, offset: usize) -> bool {
        match self {
            AnalysisError::At { span, .. } => span.begin == offset,
            AnalysisError::Many(errors) => errors.iter().all(|it| it.is_at(offset)),
            AnalysisError::Unpositioned(_) => false,
        }
    }

    /// Start offsets of all the positioned parts of this error.
    #[must_use]
    pub fn positions(&self) -> Vec<usize> {
        match self {
            AnalysisError::At { span, .. } => vec![span.begin],
            AnalysisError::Many(errors) => {
                errors.iter().flat_map(AnalysisError::positions).collect()
            }
            AnalysisError::Unpositioned(_) => vec![],
        }
    }
}
