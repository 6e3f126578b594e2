// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::KeyModifiers;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierKeysMask {
    pub shift_key_state: KeyState,
    pub ctrl_key_state: KeyState,
    pub alt_key_state: KeyState,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyState {
    Pressed,
    #[default]
    NotPressed,
}

impl ModifierKeysMask {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt_key_state = KeyState::Pressed;
        self
    }

    #[must_use]
    pub fn without_shift(mut self) -> Self {
        self.shift_key_state = KeyState::NotPressed;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { *self == Self::default() }

    #[must_use]
    pub fn is_shift(&self) -> bool { self.shift_key_state == KeyState::Pressed }

    #[must_use]
    pub fn is_ctrl(&self) -> bool { self.ctrl_key_state == KeyState::Pressed }

    #[must_use]
    pub fn is_alt(&self) -> bool { self.alt_key_state == KeyState::Pressed }
}

impl From<KeyModifiers> for ModifierKeysMask {
    fn from(other: KeyModifiers) -> ModifierKeysMask {
        let mut it = ModifierKeysMask::new();
        if other.intersects(KeyModifiers::SHIFT) {
            it.shift_key_state = KeyState::Pressed;
        }
        if other.intersects(KeyModifiers::CONTROL) {
            it.ctrl_key_state = KeyState::Pressed;
        }
        if other.intersects(KeyModifiers::ALT) {
            it.alt_key_state = KeyState::Pressed;
        }
        it
    }
}
