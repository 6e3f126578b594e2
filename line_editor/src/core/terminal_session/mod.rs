// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words termios

//! Raw mode for the duration of a single `read_line`.
//!
//! | Mode   | canonical | echo | VMIN | VTIME |
//! |:-------|:----------|:-----|:-----|:------|
//! | Cooked | on        | on   | n/a  | n/a   |
//! | Editor | off       | off  | 1    | 0     |
//!
//! Signal generation (`ISIG`) stays on so that `Ctrl+C` still arrives as `SIGINT`, which
//! the editor turns into a restart of the current line.
//!
//! [`TerminalSession::start`] snapshots the attributes of a [`TerminalDevice`] before
//! changing them and [`TerminalSession::finish`] puts the snapshot back.

// Attach.
pub mod terminal_device;
pub mod terminal_session_impl;
#[cfg(unix)]
pub mod tty_device_unix;

// Re-export.
pub use terminal_device::*;
pub use terminal_session_impl::*;
#[cfg(unix)]
pub use tty_device_unix::*;
