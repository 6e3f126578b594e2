// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{AnalysisError, StyleFlag, StyleFlags, SyntaxTree, Token};
use crate::{CommandHeadStylist, DiagnosticPolicySetting, EditorState, Mode, ShellCompiler,
            ShellParser};
use std::{fmt::{Debug, Formatter},
          sync::Arc};

/// Turns buffer text into a [`SyntaxTree`].
pub trait Parser: Send + Sync {
    /// # Errors
    ///
    /// Returns an error positioned at a byte offset of `source` when it does not parse.
    fn parse(&self, source: &str) -> Result<SyntaxTree, AnalysisError>;
}

/// Checks a parsed buffer for semantic errors. The compiled form itself is of no use to
/// the editor and is dropped.
pub trait Compiler: Send + Sync {
    /// # Errors
    ///
    /// Returns the semantic errors found in `tree`.
    fn compile(&self, tree: &SyntaxTree) -> Result<(), AnalysisError>;
}

/// Extra style flags for a token, eg: to color command names by whether they exist.
pub trait Stylist: Send + Sync {
    fn style(&self, token: &Token, state: &EditorState) -> StyleFlags;
}

impl<F> Parser for F
where
    F: Fn(&str) -> Result<SyntaxTree, AnalysisError> + Send + Sync,
{
    fn parse(&self, source: &str) -> Result<SyntaxTree, AnalysisError> { self(source) }
}

impl<F> Compiler for F
where
    F: Fn(&SyntaxTree) -> Result<(), AnalysisError> + Send + Sync,
{
    fn compile(&self, tree: &SyntaxTree) -> Result<(), AnalysisError> { self(tree) }
}

impl<F> Stylist for F
where
    F: Fn(&Token, &EditorState) -> StyleFlags + Send + Sync,
{
    fn style(&self, token: &Token, state: &EditorState) -> StyleFlags { self(token, state) }
}

pub type DiagnosticPredicate = dyn Fn(&AnalysisError, &str) -> bool + Send + Sync;

/// Decides which parse and compile errors become tips. Errors that are not reported
/// still style the tokens they cover.
#[derive(Clone, Default)]
pub enum DiagnosticPolicy {
    /// Hide errors positioned exactly at the end of the buffer, they usually complain
    /// about text that has not been typed yet. This is a heuristic: a genuinely
    /// misplaced character at the very end is hidden too.
    #[default]
    SuppressAtEndOfBuffer,
    ReportAll,
    /// Report when the predicate, given the error and the buffer, returns true.
    Custom(Arc<DiagnosticPredicate>),
}

impl Debug for DiagnosticPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticPolicy::SuppressAtEndOfBuffer => f.write_str("SuppressAtEndOfBuffer"),
            DiagnosticPolicy::ReportAll => f.write_str("ReportAll"),
            DiagnosticPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<DiagnosticPolicySetting> for DiagnosticPolicy {
    fn from(setting: DiagnosticPolicySetting) -> Self {
        match setting {
            DiagnosticPolicySetting::SuppressAtEndOfBuffer => {
                DiagnosticPolicy::SuppressAtEndOfBuffer
            }
            DiagnosticPolicySetting::ReportAll => DiagnosticPolicy::ReportAll,
        }
    }
}

impl DiagnosticPolicy {
    #[must_use]
    pub fn should_report(&self, error: &AnalysisError, buffer: &str) -> bool {
        match self {
            DiagnosticPolicy::SuppressAtEndOfBuffer => !error.is_at(buffer.len()),
            DiagnosticPolicy::ReportAll => true,
            DiagnosticPolicy::Custom(predicate) => predicate(error, buffer),
        }
    }
}

/// Re-parses and re-compiles the buffer before each render. Never fails: every problem
/// ends up as a tip or as token styling.
#[derive(Clone)]
pub struct LiveAnalyzer {
    parser: Arc<dyn Parser>,
    compiler: Arc<dyn Compiler>,
    stylists: Vec<Arc<dyn Stylist>>,
    policy: DiagnosticPolicy,
}

impl Debug for LiveAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveAnalyzer")
            .field("stylists", &self.stylists.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// The bundled shell syntax with command head styling.
impl Default for LiveAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(ShellParser), Arc::new(ShellCompiler::default()))
            .with_stylist(Arc::new(CommandHeadStylist::default()))
    }
}

impl LiveAnalyzer {
    #[must_use]
    pub fn new(parser: Arc<dyn Parser>, compiler: Arc<dyn Compiler>) -> Self {
        Self {
            parser,
            compiler,
            stylists: vec![],
            policy: DiagnosticPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_stylist(mut self, stylist: Arc<dyn Stylist>) -> Self {
        self.stylists.push(stylist);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DiagnosticPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &DiagnosticPolicy { &self.policy }

    /// Rebuild `state.tokens` from the buffer. Tips are only added when `with_tips` is
    /// set. Does nothing in completion mode.
    pub fn analyze(&self, state: &mut EditorState, with_tips: bool) {
        if state.mode.mode() == Mode::Completion {
            return;
        }

        let source = state.buffer.clone();
        state.tokens = match self.parser.parse(&source) {
            Err(err) => {
                if with_tips && self.policy.should_report(&err, &source) {
                    state.add_tip(format!("parser error: {err}"));
                }
                vec![Token::parser_error(&source)]
            }
            Ok(tree) => {
                let mut tokens = tree.tokenize();
                if let Err(err) = self.compiler.compile(&tree) {
                    if with_tips && self.policy.should_report(&err, &source) {
                        state.add_tip(format!("compiler error: {err}"));
                    }
                    for position in err.positions() {
                        if let Some(token) =
                            tokens.iter_mut().find(|it| it.span.contains(position))
                        {
                            token.add_style(&[StyleFlag::CompilerError]);
                        }
                    }
                }
                tokens
            }
        };

        let extra_styles: Vec<StyleFlags> = state
            .tokens
            .iter()
            .map(|token| {
                let mut acc = StyleFlags::new();
                for stylist in &self.stylists {
                    acc.extend(stylist.style(token, state));
                }
                acc
            })
            .collect();
        for (token, flags) in state.tokens.iter_mut().zip(extra_styles) {
            token.add_style(&flags);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletionState, ModeState, NodeKind, Span, SyntaxNode, TokenKind};

    /// Fails with an error at `position`, or parses every char as a bareword.
    fn parser_failing_at(position: Option<usize>) -> Arc<dyn Parser> {
        Arc::new(move |source: &str| match position {
            Some(at) => Err(AnalysisError::at("unexpected thing", Span::new(at, at))),
            None => Ok(SyntaxTree {
                source: source.into(),
                nodes: source
                    .char_indices()
                    .filter(|(_, ch)| !ch.is_whitespace())
                    .map(|(index, ch)| SyntaxNode {
                        kind: NodeKind::Bareword,
                        span: Span::new(index, index + ch.len_utf8()),
                        is_form_head: index == 0,
                    })
                    .collect(),
            }),
        })
    }

    fn compiler_failing_at(position: Option<usize>) -> Arc<dyn Compiler> {
        Arc::new(move |_: &SyntaxTree| match position {
            Some(at) => Err(AnalysisError::at("no such thing", Span::new(at, at + 1))),
            None => Ok(()),
        })
    }

    fn state_with(buffer: &str) -> EditorState {
        let mut state = EditorState::new_active();
        state.set_buffer(buffer);
        state
    }

    #[test]
    fn test_parse_error_at_end_is_suppressed() {
        let analyzer = LiveAnalyzer::new(parser_failing_at(Some(4)), compiler_failing_at(None));
        let mut state = state_with("ls '");

        analyzer.analyze(&mut state, true);

        assert!(state.tips.is_empty());
        assert_eq!(state.tokens, vec![Token::parser_error("ls '")]);
    }

    #[test]
    fn test_parse_error_before_end_gives_one_tip() {
        let analyzer = LiveAnalyzer::new(parser_failing_at(Some(1)), compiler_failing_at(None));
        let mut state = state_with("l) x");

        analyzer.analyze(&mut state, true);

        assert_eq!(state.tips, vec!["parser error: unexpected thing".to_string()]);
        assert_eq!(state.tokens.len(), 1);
        assert_eq!(state.tokens[0].kind, TokenKind::ParserError);
    }

    #[test]
    fn test_report_all_policy_shows_errors_at_end() {
        let analyzer = LiveAnalyzer::new(parser_failing_at(Some(4)), compiler_failing_at(None))
            .with_policy(DiagnosticPolicy::ReportAll);
        let mut state = state_with("ls '");

        analyzer.analyze(&mut state, true);

        assert_eq!(state.tips.len(), 1);
    }

    #[test]
    fn test_custom_policy() {
        let analyzer = LiveAnalyzer::new(parser_failing_at(Some(1)), compiler_failing_at(None))
            .with_policy(DiagnosticPolicy::Custom(Arc::new(|_: &AnalysisError, buffer: &str| {
                buffer.len() > 10
            })));
        let mut state = state_with("l) x");

        analyzer.analyze(&mut state, true);

        assert!(state.tips.is_empty());
    }

    #[test]
    fn test_compile_error_styles_covering_token() {
        let analyzer = LiveAnalyzer::new(parser_failing_at(None), compiler_failing_at(Some(2)));
        let mut state = state_with("a b c");

        analyzer.analyze(&mut state, true);

        assert_eq!(state.tips, vec!["compiler error: no such thing".to_string()]);
        let styled: Vec<_> = state
            .tokens
            .iter()
            .filter(|it| it.more_style.contains(&StyleFlag::CompilerError))
            .map(|it| it.text.as_str())
            .collect();
        assert_eq!(styled, vec!["b"]);
    }

    #[test]
    fn test_no_tips_when_not_asked() {
        let analyzer = LiveAnalyzer::new(parser_failing_at(None), compiler_failing_at(Some(0)));
        let mut state = state_with("a b");

        analyzer.analyze(&mut state, false);

        assert!(state.tips.is_empty());
        assert!(state.tokens[0].more_style.contains(&StyleFlag::CompilerError));
    }

    #[test]
    fn test_stylists_are_merged() {
        let analyzer = LiveAnalyzer::new(parser_failing_at(None), compiler_failing_at(None))
            .with_stylist(Arc::new(|token: &Token, _: &EditorState| {
                let mut acc = StyleFlags::new();
                if token.is_form_head {
                    acc.push(StyleFlag::GoodCommand);
                }
                acc
            }));
        let mut state = state_with("a b");

        analyzer.analyze(&mut state, true);

        assert!(state.tokens[0].more_style.contains(&StyleFlag::GoodCommand));
        assert!(state.tokens[2].more_style.is_empty());
    }

    #[test]
    fn test_completion_mode_is_left_alone() {
        let analyzer = LiveAnalyzer::new(parser_failing_at(Some(0)), compiler_failing_at(None));
        let mut state = state_with(") oops");
        state.mode = ModeState::Completion(CompletionState::default());

        analyzer.analyze(&mut state, true);

        assert!(state.tokens.is_empty());
        assert!(state.tips.is_empty());
    }
}
