// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod layout;
pub mod renderer;
pub mod terminal_renderer;
pub mod token_style;

// Re-export.
pub use layout::*;
pub use renderer::*;
pub use terminal_renderer::*;
pub use token_style::*;
