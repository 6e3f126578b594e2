// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Key descriptors are the strings used to name keys in binding tables, eg: `Ctrl-A`,
//! `Alt-b`, `Shift-Tab`, `Enter`, `F1`, `Space`, `x`. The grammar is
//! `(Modifier "-")* Key` where a modifier is one of `Ctrl`/`C`, `Alt`/`A`/`Meta`/`M`
//! or `Shift`/`S`.

use super::{FunctionKey, Key, KeyPress, ModifierKeysMask, SpecialKey};
use std::{fmt::{Display, Formatter},
          str::FromStr};

pub const DEFAULT_BINDING_KEY_NAME: &str = "Default";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum KeyDescriptorError {
    #[error("empty key")]
    #[diagnostic(code(r3bl_line_editor::key::empty))]
    Empty,

    #[error("bad modifier: {0}")]
    #[diagnostic(
        code(r3bl_line_editor::key::bad_modifier),
        help("Modifiers are Ctrl (C), Alt (A, Meta, M) and Shift (S)")
    )]
    BadModifier(String),

    #[error("bad key: {0}")]
    #[diagnostic(
        code(r3bl_line_editor::key::bad_key),
        help("Use a single character, a key name like Enter or Tab, or F1 to F12")
    )]
    BadKey(String),
}

impl FromStr for KeyPress {
    type Err = KeyDescriptorError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let mut mask = ModifierKeysMask::new();
        let mut rest = descriptor;

        // A leading "-" is the minus key itself, not a separator.
        while let Some(index) = rest.find('-').filter(|index| *index > 0) {
            mask = match &rest[..index] {
                "Ctrl" | "C" => mask.with_ctrl(),
                "Alt" | "A" | "Meta" | "M" => mask.with_alt(),
                "Shift" | "S" => mask.with_shift(),
                other => return Err(KeyDescriptorError::BadModifier(other.to_string())),
            };
            rest = &rest[index + 1..];
        }

        Ok(KeyPress::new(parse_key_name(rest)?, mask))
    }
}

fn parse_key_name(name: &str) -> Result<Key, KeyDescriptorError> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(KeyDescriptorError::Empty),
        (Some(ch), None) => Ok(Key::Character(ch)),
        _ if name == "Space" => Ok(Key::Character(' ')),
        _ => SpecialKey::from_str(name)
            .map(Key::SpecialKey)
            .or_else(|_| FunctionKey::from_str(name).map(Key::FunctionKey))
            .map_err(|_| KeyDescriptorError::BadKey(name.to_string())),
    }
}

/// A key in a binding table: a concrete key press, or the mode's fallback entry that is
/// used when the pressed key has no binding of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKey {
    Key(KeyPress),
    Default,
}

impl From<KeyPress> for BindingKey {
    fn from(key_press: KeyPress) -> Self { BindingKey::Key(key_press) }
}

impl FromStr for BindingKey {
    type Err = KeyDescriptorError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        if descriptor == DEFAULT_BINDING_KEY_NAME {
            return Ok(BindingKey::Default);
        }
        KeyPress::from_str(descriptor).map(BindingKey::Key)
    }
}

impl Display for BindingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingKey::Key(key_press) => write!(f, "{key_press}"),
            BindingKey::Default => f.write_str(DEFAULT_BINDING_KEY_NAME),
        }
    }
}
