// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod key_descriptor;
pub mod keypress;
pub mod modifier_keys_mask;

// Re-export.
pub use key_descriptor::*;
pub use keypress::*;
pub use modifier_keys_mask::*;
