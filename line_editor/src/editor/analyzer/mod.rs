// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Live diagnostics. Before every render the buffer is parsed and compiled again, the
//! resulting tokens are styled, and errors the user should see become tips.

// Attach.
pub mod analysis_error;
pub mod live_analyzer;
pub mod syntax_tree;

// Re-export.
pub use analysis_error::*;
pub use live_analyzer::*;
pub use syntax_tree::*;
