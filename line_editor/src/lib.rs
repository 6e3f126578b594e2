// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words rprompt termios histlist

//! # r3bl_line_editor
//!
//! The interactive line editing engine of a command shell. While a command line is being
//! composed, the [`Editor`] owns the terminal: it puts the terminal into raw mode, turns
//! key, mouse and signal events into edits of an in-memory buffer, and re-renders the
//! buffer after every event together with live diagnostics (parse and compile error tips
//! plus syntax aware token styling).
//!
//! ## Architecture
//!
//! ```text
//!  TerminalSession ──► EventSource ──► read loop (tokio::select!) ──► dispatch_key
//!        ▲                                   │                            │
//!        │                                   ▼                            ▼
//!     finish  ◄────── ExitWithResult ◄── LiveAnalyzer + Renderer ◄── BindingTables
//! ```
//!
//! - [`TerminalSession`] enters raw mode (canonical and echo off, `VMIN=1`, `VTIME=0`),
//!   probes for a missing end of line, and restores the saved attributes on every exit
//!   path.
//! - The read loop waits on one event at a time from the key, mouse, cursor position
//!   report, reader error, signal and external command lookup channels.
//! - Keys are resolved against the per [`Mode`] [`BindingTable`]. The bound action leaves
//!   a [`NextAction`] behind: continue, reprocess the same key in the new mode, or exit
//!   with a [`LineRead`].
//! - Before each render the [`LiveAnalyzer`] re-parses and re-compiles the buffer using
//!   the pluggable [`Parser`] and [`Compiler`] (a small shell syntax is provided in
//!   [`mod@shell_syntax`]).
//!
//! ## Quick start
//!
//! ```no_run
//! use r3bl_line_editor::{Editor, LineRead};
//!
//! # async fn run() -> miette::Result<()> {
//! let mut editor = Editor::try_new_for_terminal()?;
//! loop {
//!     match editor.read_line().await {
//!         LineRead::Line(line) => println!("got: {line}"),
//!         LineRead::Eof => break,
//!         LineRead::Error(err) => return Err(err.into()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach.
pub mod core;
pub mod editor;
pub mod history;
pub mod keys;
pub mod shell_syntax;

// Re-export.
pub use self::core::*;
pub use editor::*;
pub use history::*;
pub use keys::*;
pub use shell_syntax::*;
