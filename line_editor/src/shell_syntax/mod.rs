// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A small shell language for the [`crate::LiveAnalyzer`]: words, quotes, variables, `|`
//! and `;`. Enough to show what live diagnostics and command styling look like, and to
//! test them.

// Attach.
pub mod command_head_stylist;
pub mod shell_compiler;
pub mod shell_parser;

// Re-export.
pub use command_head_stylist::*;
pub use shell_compiler::*;
pub use shell_parser::*;
