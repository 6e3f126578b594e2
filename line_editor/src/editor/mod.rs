// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod analyzer;
pub mod dispatch;
pub mod editor_impl;
pub mod event_source;
pub mod modes;
pub mod render;
pub mod state;

// Re-export.
pub use analyzer::*;
pub use dispatch::*;
pub use editor_impl::*;
pub use event_source::*;
pub use modes::*;
pub use render::*;
pub use state::*;
