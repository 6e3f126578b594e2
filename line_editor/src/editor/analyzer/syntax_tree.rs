// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::InlineVec;
use std::fmt::{Display, Formatter};

/// Byte range `begin..end` in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(begin: usize, end: usize) -> Self { Self { begin, end } }

    #[must_use]
    pub fn len(&self) -> usize { self.end.saturating_sub(self.begin) }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        self.begin <= offset && offset < self.end
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum NodeKind {
    Bareword,
    SingleQuoted,
    DoubleQuoted,
    Variable,
    /// `|` or `;`.
    Separator,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    /// First word of a form, ie: the command name.
    pub is_form_head: bool,
}

/// A parsed buffer: its leaf nodes in source order. Whitespace between nodes is not
/// represented.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyntaxTree {
    pub source: String,
    pub nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    #[must_use]
    pub fn text_of(&self, node: &SyntaxNode) -> &str {
        self.source
            .get(node.span.begin..node.span.end)
            .unwrap_or_default()
    }

    /// Split the source into tokens that cover every byte of it, in order. Gaps between
    /// nodes become [`TokenKind::Space`] tokens.
    #[must_use]
    pub fn tokenize(&self) -> Vec<Token> {
        let mut acc = vec![];
        let mut offset = 0;
        for node in &self.nodes {
            if node.span.begin > offset {
                acc.push(Token::new(
                    TokenKind::Space,
                    &self.source,
                    Span::new(offset, node.span.begin),
                ));
            }
            let mut token = Token::new(TokenKind::Node(node.kind), &self.source, node.span);
            token.is_form_head = node.is_form_head;
            acc.push(token);
            offset = node.span.end;
        }
        if offset < self.source.len() {
            acc.push(Token::new(
                TokenKind::Space,
                &self.source,
                Span::new(offset, self.source.len()),
            ));
        }
        acc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Node(NodeKind),
    Space,
    /// The whole buffer, when it does not parse.
    ParserError,
}

/// Extra style layered on top of the base style of a token's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum StyleFlag {
    ParserError,
    CompilerError,
    GoodCommand,
    BadCommand,
}

pub type StyleFlags = InlineVec<StyleFlag>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    pub is_form_head: bool,
    pub more_style: StyleFlags,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, source: &str, span: Span) -> Self {
        Self {
            kind,
            text: source.get(span.begin..span.end).unwrap_or_default().to_string(),
            span,
            is_form_head: false,
            more_style: StyleFlags::new(),
        }
    }

    /// The token used when the buffer does not parse.
    #[must_use]
    pub fn parser_error(source: &str) -> Self {
        let mut it = Self::new(TokenKind::ParserError, source, Span::new(0, source.len()));
        it.add_style(&[StyleFlag::ParserError]);
        it
    }

    /// Merge `flags` into [`Self::more_style`], skipping ones already present.
    pub fn add_style(&mut self, flags: &[StyleFlag]) {
        for flag in flags {
            if !self.more_style.contains(flag) {
                self.more_style.push(*flag);
            }
        }
    }
}
