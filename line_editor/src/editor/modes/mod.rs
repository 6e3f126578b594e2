// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words histlist

// Attach.
pub mod completion;
pub mod history_listing;
pub mod history_walk;
pub mod navigation;

// Re-export.
pub use completion::*;
pub use history_listing::*;
pub use history_walk::*;
pub use navigation::*;
