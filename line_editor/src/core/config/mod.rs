// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod editor_config;

// Re-export.
pub use editor_config::*;
