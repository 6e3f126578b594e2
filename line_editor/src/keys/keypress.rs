// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::ModifierKeysMask;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Build a [`KeyPress`] without spelling out the enum variants.
///
/// ```
/// use r3bl_line_editor::{keypress, Key, KeyPress, ModifierKeysMask, SpecialKey};
/// assert_eq!(keypress!(@char 'a'), KeyPress::Plain { key: Key::Character('a') });
/// let ctrl_a = keypress!(@char ModifierKeysMask::new().with_ctrl(), 'a');
/// assert_eq!(ctrl_a.to_string(), "Ctrl-A");
/// assert_eq!(keypress!(@special SpecialKey::Enter).to_string(), "Enter");
/// ```
#[macro_export]
macro_rules! keypress {
    (@char $arg_char : expr) => {
        $crate::KeyPress::new($crate::Key::Character($arg_char), $crate::ModifierKeysMask::new())
    };

    (@char $arg_modifiers : expr, $arg_char : expr) => {
        $crate::KeyPress::new($crate::Key::Character($arg_char), $arg_modifiers)
    };

    (@special $arg_special : expr) => {
        $crate::KeyPress::new(
            $crate::Key::SpecialKey($arg_special),
            $crate::ModifierKeysMask::new(),
        )
    };

    (@special $arg_modifiers : expr, $arg_special : expr) => {
        $crate::KeyPress::new($crate::Key::SpecialKey($arg_special), $arg_modifiers)
    };

    (@fn $arg_function : expr) => {
        $crate::KeyPress::new(
            $crate::Key::FunctionKey($arg_function),
            $crate::ModifierKeysMask::new(),
        )
    };
}

/// A decoded key press. Always built through [`KeyPress::new`] so that equal key
/// presses compare and hash equal, which binding table lookups rely on:
/// - shift is folded into the character itself (`Shift+a` is `A`),
/// - `Ctrl+letter` always carries the upper case letter,
/// - an empty mask is [`KeyPress::Plain`].
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, Copy)]
pub enum KeyPress {
    Plain { key: Key },
    WithModifiers { key: Key, mask: ModifierKeysMask },
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, Copy)]
pub enum Key {
    Character(char),
    SpecialKey(SpecialKey),
    FunctionKey(FunctionKey),
}

#[derive(
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Copy,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
pub enum FunctionKey {
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

/// `Shift+Tab` is [`SpecialKey::Tab`] with shift in the mask.
#[derive(
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Copy,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
pub enum SpecialKey {
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Delete,
    Insert,
    Esc,
}

impl KeyPress {
    #[must_use]
    pub fn new(key: Key, mask: ModifierKeysMask) -> Self {
        let (key, mask) = match key {
            Key::Character(ch) => {
                let ch = if mask.is_shift() || mask.is_ctrl() {
                    ch.to_ascii_uppercase()
                } else {
                    ch
                };
                (Key::Character(ch), mask.without_shift())
            }
            other => (other, mask),
        };
        if mask.is_empty() {
            KeyPress::Plain { key }
        } else {
            KeyPress::WithModifiers { key, mask }
        }
    }

    #[must_use]
    pub fn key(&self) -> Key {
        match self {
            KeyPress::Plain { key } | KeyPress::WithModifiers { key, .. } => *key,
        }
    }

    #[must_use]
    pub fn mask(&self) -> ModifierKeysMask {
        match self {
            KeyPress::Plain { .. } => ModifierKeysMask::new(),
            KeyPress::WithModifiers { mask, .. } => *mask,
        }
    }

    /// The character this key inserts when typed in insert mode, if any.
    #[must_use]
    pub fn printable_char(&self) -> Option<char> {
        match self {
            KeyPress::Plain {
                key: Key::Character(ch),
            } if !ch.is_control() => Some(*ch),
            _ => None,
        }
    }
}

impl Display for KeyPress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mask = self.mask();
        if mask.is_ctrl() {
            f.write_str("Ctrl-")?;
        }
        if mask.is_alt() {
            f.write_str("Alt-")?;
        }
        if mask.is_shift() {
            f.write_str("Shift-")?;
        }
        match self.key() {
            Key::Character(' ') => f.write_str("Space"),
            Key::Character(ch) => write!(f, "{ch}"),
            Key::SpecialKey(special_key) => write!(f, "{special_key}"),
            Key::FunctionKey(function_key) => write!(f, "{function_key}"),
        }
    }
}

pub mod convert_key_event {
    use super::{FunctionKey, Key, KeyCode, KeyEvent, KeyEventKind, KeyPress,
                ModifierKeysMask, SpecialKey};

    /// Only [`KeyEventKind::Press`] events are converted. Keys the editor has no use
    /// for (media keys, modifier only presses, etc) are rejected.
    impl TryFrom<KeyEvent> for KeyPress {
        type Error = ();

        fn try_from(key_event: KeyEvent) -> Result<Self, Self::Error> {
            if key_event.kind != KeyEventKind::Press {
                return Err(());
            }
            let mut mask = ModifierKeysMask::from(key_event.modifiers);
            let key = match key_event.code {
                KeyCode::BackTab => {
                    mask = mask.with_shift();
                    Key::SpecialKey(SpecialKey::Tab)
                }
                other => copy_code_from_key_event(other).ok_or(())?,
            };
            Ok(KeyPress::new(key, mask))
        }
    }

    fn match_fn_key(fn_key: u8) -> Option<Key> {
        let it = match fn_key {
            1 => FunctionKey::F1,
            2 => FunctionKey::F2,
            3 => FunctionKey::F3,
            4 => FunctionKey::F4,
            5 => FunctionKey::F5,
            6 => FunctionKey::F6,
            7 => FunctionKey::F7,
            8 => FunctionKey::F8,
            9 => FunctionKey::F9,
            10 => FunctionKey::F10,
            11 => FunctionKey::F11,
            12 => FunctionKey::F12,
            _ => return None,
        };
        Some(Key::FunctionKey(it))
    }

    #[must_use]
    pub fn copy_code_from_key_event(code: KeyCode) -> Option<Key> {
        type KC = KeyCode;
        let special_key = match code {
            KC::Char(character) => return Some(Key::Character(character)),
            KC::F(fn_key) => return match_fn_key(fn_key),
            KC::Backspace => SpecialKey::Backspace,
            KC::Enter => SpecialKey::Enter,
            KC::Left => SpecialKey::Left,
            KC::Right => SpecialKey::Right,
            KC::Up => SpecialKey::Up,
            KC::Down => SpecialKey::Down,
            KC::Home => SpecialKey::Home,
            KC::End => SpecialKey::End,
            KC::PageUp => SpecialKey::PageUp,
            KC::PageDown => SpecialKey::PageDown,
            KC::Tab | KC::BackTab => SpecialKey::Tab,
            KC::Delete => SpecialKey::Delete,
            KC::Insert => SpecialKey::Insert,
            KC::Esc => SpecialKey::Esc,
            _ => return None,
        };
        Some(Key::SpecialKey(special_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers, MediaKeyCode};
    use test_case::test_case;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Result<KeyPress, ()> {
        KeyPress::try_from(KeyEvent::new(code, modifiers))
    }

    #[test_case(KeyCode::Char('a'), KeyModifiers::NONE, "a")]
    #[test_case(KeyCode::Char('A'), KeyModifiers::SHIFT, "A")]
    #[test_case(KeyCode::Char('a'), KeyModifiers::CONTROL, "Ctrl-A")]
    #[test_case(KeyCode::Char('b'), KeyModifiers::ALT, "Alt-b")]
    #[test_case(KeyCode::Char(' '), KeyModifiers::NONE, "Space")]
    #[test_case(KeyCode::Enter, KeyModifiers::NONE, "Enter")]
    #[test_case(KeyCode::BackTab, KeyModifiers::SHIFT, "Shift-Tab")]
    #[test_case(KeyCode::Left, KeyModifiers::CONTROL, "Ctrl-Left")]
    #[test_case(KeyCode::F(5), KeyModifiers::NONE, "F5")]
    fn test_convert_and_display(code: KeyCode, modifiers: KeyModifiers, expected: &str) {
        let key_press = press(code, modifiers).unwrap();
        assert_eq!(key_press.to_string(), expected);
    }

    #[test]
    fn test_shift_is_folded_into_characters() {
        assert_eq!(
            press(KeyCode::Char('A'), KeyModifiers::SHIFT).unwrap(),
            KeyPress::Plain {
                key: Key::Character('A')
            }
        );
    }

    #[test]
    fn test_ctrl_letter_is_upper_case() {
        assert_eq!(
            press(KeyCode::Char('a'), KeyModifiers::CONTROL).unwrap(),
            keypress!(@char ModifierKeysMask::new().with_ctrl(), 'A')
        );
    }

    #[test]
    fn test_release_and_unknown_keys_are_rejected() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(KeyPress::try_from(release).is_err());
        assert!(press(KeyCode::Media(MediaKeyCode::Play), KeyModifiers::NONE).is_err());
        assert!(press(KeyCode::F(13), KeyModifiers::NONE).is_err());
    }

    #[test]
    fn test_printable_char() {
        assert_eq!(keypress!(@char 'x').printable_char(), Some('x'));
        assert_eq!(
            keypress!(@char ModifierKeysMask::new().with_alt(), 'x').printable_char(),
            None
        );
        assert_eq!(keypress!(@special SpecialKey::Tab).printable_char(), None);
    }
}
