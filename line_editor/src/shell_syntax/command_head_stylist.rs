// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EditorState, NodeKind, StyleFlag, StyleFlags, Stylist, Token, TokenKind};
use std::collections::HashSet;

/// Commands the bundled shell syntax treats as always available.
pub const SHELL_BUILTINS: &[&str] = &[
    "and", "cd", "count", "each", "echo", "eval", "exit", "false", "fn", "for", "if",
    "nop", "not", "or", "pprint", "print", "put", "pwd", "range", "repr", "set",
    "sleep", "true", "try", "use", "var", "while",
];

/// Colors command names: good if a builtin, an external command found on the search path,
/// or a path. Bad otherwise.
#[derive(Debug, Clone)]
pub struct CommandHeadStylist {
    pub builtins: HashSet<String>,
}

impl Default for CommandHeadStylist {
    fn default() -> Self {
        Self {
            builtins: SHELL_BUILTINS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Stylist for CommandHeadStylist {
    fn style(&self, token: &Token, state: &EditorState) -> StyleFlags {
        let mut acc = StyleFlags::new();
        if !token.is_form_head || token.kind != TokenKind::Node(NodeKind::Bareword) {
            return acc;
        }
        let name = token.text.as_str();
        let is_good = self.builtins.contains(name)
            || state.is_external.contains(name)
            || name.contains('/');
        acc.push(if is_good {
            StyleFlag::GoodCommand
        } else {
            StyleFlag::BadCommand
        });
        acc
    }
}
