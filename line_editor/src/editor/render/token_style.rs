// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{NodeKind, StyleFlag, Token, TokenKind};
use crossterm::style::{Attribute, Color, ContentStyle};

/// Base style of the token kind with its extra style flags layered on top.
#[must_use]
pub fn style_for_token(token: &Token) -> ContentStyle {
    let mut style = ContentStyle::new();
    style.foreground_color = match token.kind {
        TokenKind::Node(NodeKind::SingleQuoted | NodeKind::DoubleQuoted) => Some(Color::Yellow),
        TokenKind::Node(NodeKind::Variable) => Some(Color::Magenta),
        TokenKind::Node(NodeKind::Comment) => Some(Color::DarkGrey),
        TokenKind::Node(NodeKind::Separator) => Some(Color::Cyan),
        TokenKind::Node(NodeKind::Bareword) | TokenKind::Space | TokenKind::ParserError => {
            None
        }
    };
    if token.kind == TokenKind::Node(NodeKind::Separator) {
        style.attributes.set(Attribute::Bold);
    }
    for flag in &token.more_style {
        match flag {
            StyleFlag::GoodCommand => style.foreground_color = Some(Color::Green),
            StyleFlag::BadCommand => style.foreground_color = Some(Color::Red),
            StyleFlag::ParserError | StyleFlag::CompilerError => {
                style.attributes.set(Attribute::Underlined);
                style.underline_color = Some(Color::Red);
            }
        }
    }
    style
}

/// Mode banners, eg: ` COMPLETING `.
#[must_use]
pub fn header_style() -> ContentStyle {
    let mut style = ContentStyle::new();
    style.attributes.set(Attribute::Reverse);
    style.attributes.set(Attribute::Bold);
    style
}

#[must_use]
pub fn list_item_style(is_selected: bool) -> ContentStyle {
    let mut style = ContentStyle::new();
    if is_selected {
        style.attributes.set(Attribute::Reverse);
    }
    style
}

#[must_use]
pub fn tip_style() -> ContentStyle {
    let mut style = ContentStyle::new();
    style.foreground_color = Some(Color::DarkYellow);
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn test_flags_override_base_style() {
        let mut token = Token::new(TokenKind::Node(NodeKind::Bareword), "ls", Span::new(0, 2));
        assert_eq!(style_for_token(&token), ContentStyle::new());

        token.add_style(&[StyleFlag::BadCommand, StyleFlag::CompilerError]);
        let style = style_for_token(&token);
        assert_eq!(style.foreground_color, Some(Color::Red));
        assert!(style.attributes.has(Attribute::Underlined));
    }

    #[test]
    fn test_selected_items_are_reversed() {
        assert!(list_item_style(true).attributes.has(Attribute::Reverse));
        assert!(!list_item_style(false).attributes.has(Attribute::Reverse));
    }
}
