// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words rprompt termios

use super::{ModeState, NextAction};
use crate::{KeyPress, TerminalAttributes, Token, UNKNOWN_HISTORY_SEQ};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Everything one read of a line works on. Reset at the start of every read.
///
/// `dot` is a byte offset into `buffer` and always sits on a char boundary. The editing
/// methods move it by grapheme cluster and keep `dot <= buffer.len()`.
#[derive(Debug)]
pub struct EditorState {
    /// Builtins may only run while this is set.
    pub active: bool,
    pub buffer: String,
    pub dot: usize,
    pub prompt: String,
    pub rprompt: String,
    /// Tiles `buffer`, rebuilt by [`crate::LiveAnalyzer`] before each render.
    pub tokens: Vec<Token>,
    /// Cleared after every render.
    pub tips: Vec<String>,
    /// Kept until the renderer prints them.
    pub notifications: Vec<String>,
    pub mode: ModeState,
    /// Names of executables found by [`crate::ExternalCommandLookup`].
    pub is_external: HashSet<String>,
    pub last_key: Option<KeyPress>,
    next_action: NextAction,
    /// Attributes the terminal had before the read started. Only set while a read is in
    /// progress.
    pub saved_termios: Option<TerminalAttributes>,
    /// Sequence number the accepted line will get in history, [`UNKNOWN_HISTORY_SEQ`] if
    /// the store could not tell.
    pub history_seq: i64,
    /// Clear the screen on the next render.
    pub force_full_redraw: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            active: false,
            buffer: String::new(),
            dot: 0,
            prompt: String::new(),
            rprompt: String::new(),
            tokens: vec![],
            tips: vec![],
            notifications: vec![],
            mode: ModeState::default(),
            is_external: HashSet::new(),
            last_key: None,
            next_action: NextAction::default(),
            saved_termios: None,
            history_seq: UNKNOWN_HISTORY_SEQ,
            force_full_redraw: false,
        }
    }
}

impl EditorState {
    /// A fresh, active state.
    #[must_use]
    pub fn new_active() -> Self {
        Self {
            active: true,
            ..Default::default()
        }
    }

    /// Start over after an interrupt. The terminal snapshot, the external command set
    /// and the history sequence number survive, and the read stays active.
    pub fn reset_for_interrupt(&mut self) {
        let saved_termios = self.saved_termios.take();
        let is_external = std::mem::take(&mut self.is_external);
        *self = Self {
            active: self.active,
            saved_termios,
            is_external,
            history_seq: self.history_seq,
            ..Default::default()
        };
    }

    pub fn add_tip(&mut self, tip: impl Into<String>) { self.tips.push(tip.into()); }

    pub fn notify(&mut self, notification: impl Into<String>) {
        self.notifications.push(notification.into());
    }

    pub fn set_next_action(&mut self, next_action: NextAction) {
        self.next_action = next_action;
    }

    /// Read and reset the action left behind by the last binding.
    pub fn take_next_action(&mut self) -> NextAction {
        std::mem::take(&mut self.next_action)
    }

    /// Replace the buffer and put the dot at its end.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.dot = self.buffer.len();
    }

    /// Insert `text` at the dot and move the dot after it.
    pub fn insert_at_dot(&mut self, text: &str) {
        self.buffer.insert_str(self.dot, text);
        self.dot += text.len();
    }

    /// Remove `begin..end` (byte offsets, clamped to the buffer) and fix up the dot.
    pub fn kill_range(&mut self, begin: usize, end: usize) {
        let end = end.min(self.buffer.len());
        let begin = begin.min(end);
        self.buffer.replace_range(begin..end, "");
        if self.dot >= end {
            self.dot -= end - begin;
        } else if self.dot > begin {
            self.dot = begin;
        }
    }

    #[must_use]
    pub fn prev_grapheme_boundary(&self) -> usize {
        self.buffer[..self.dot]
            .grapheme_indices(true)
            .next_back()
            .map_or(0, |(index, _)| index)
    }

    #[must_use]
    pub fn next_grapheme_boundary(&self) -> usize {
        self.buffer[self.dot..]
            .graphemes(true)
            .next()
            .map_or(self.buffer.len(), |grapheme| self.dot + grapheme.len())
    }

    /// Start of the word before the dot. Words are runs of non whitespace.
    #[must_use]
    pub fn prev_word_start(&self) -> usize {
        let before = &self.buffer[..self.dot];
        let trimmed = before.trim_end();
        trimmed
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map_or(0, |(index, ch)| index + ch.len_utf8())
    }

    /// Start of the next word after the dot, or the end of the buffer.
    #[must_use]
    pub fn next_word_start(&self) -> usize {
        let after = &self.buffer[self.dot..];
        let word_len = after.find(char::is_whitespace).unwrap_or(after.len());
        let rest = &after[word_len..];
        let space_len = rest.len() - rest.trim_start().len();
        self.dot + word_len + space_len
    }
}
