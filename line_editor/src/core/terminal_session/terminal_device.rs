// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios

use std::{fmt::Debug, io, sync::Arc};

/// The platform terminal attribute snapshot carried along with the logical fields, so
/// that restoring puts back every flag, not only the ones the editor touches.
#[cfg(unix)]
pub type NativeTermios = rustix::termios::Termios;
#[cfg(not(unix))]
pub type NativeTermios = ();

/// The subset of terminal attributes the editor changes, plus the full native snapshot
/// when the device has one.
#[derive(Clone, Debug)]
pub struct TerminalAttributes {
    pub canonical: bool,
    pub echo: bool,
    /// `VMIN`.
    pub min_read_count: u8,
    /// `VTIME`, in tenths of a second.
    pub read_timeout: u8,
    pub native: Option<NativeTermios>,
}

/// Only the logical fields take part in equality.
impl PartialEq for TerminalAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
            && self.echo == other.echo
            && self.min_read_count == other.min_read_count
            && self.read_timeout == other.read_timeout
    }
}

impl Eq for TerminalAttributes {}

impl TerminalAttributes {
    /// Typical attributes of a terminal in cooked mode.
    #[must_use]
    pub fn cooked() -> Self {
        Self {
            canonical: true,
            echo: true,
            min_read_count: 1,
            read_timeout: 0,
            native: None,
        }
    }

    /// Canonical mode off, echo off, block until at least one byte is available.
    #[must_use]
    pub fn to_raw(&self) -> Self {
        Self {
            canonical: false,
            echo: false,
            min_read_count: 1,
            read_timeout: 0,
            native: self.native.clone(),
        }
    }
}

/// A terminal whose attributes can be read and written. [`crate::TtyDevice`] is the real
/// one, [`crate::MockTerminalDevice`] is used in tests.
pub trait TerminalDevice: Send + Sync + Debug {
    /// # Errors
    ///
    /// Returns an error if the attributes can't be read, eg: not a terminal.
    fn get_attributes(&self) -> io::Result<TerminalAttributes>;

    /// # Errors
    ///
    /// Returns an error if the terminal rejects the attributes.
    fn set_attributes(&self, attributes: &TerminalAttributes) -> io::Result<()>;

    /// Width in columns.
    fn width(&self) -> u16;
}

pub type SafeTerminalDevice = Arc<dyn TerminalDevice>;

/// Used when the device can't report its size.
pub const DEFAULT_TERMINAL_WIDTH: u16 = 80;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_raw_turns_off_canonical_and_echo() {
        let raw = TerminalAttributes::cooked().to_raw();
        assert!(!raw.canonical);
        assert!(!raw.echo);
        assert_eq!(raw.min_read_count, 1);
        assert_eq!(raw.read_timeout, 0);
        assert_ne!(raw, TerminalAttributes::cooked());
    }
}
