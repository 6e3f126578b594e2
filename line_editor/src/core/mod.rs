// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod common;
pub mod config;
pub mod log;
pub mod terminal_io;
pub mod terminal_session;
pub mod test_fixtures;

// Re-export.
pub use common::*;
pub use config::*;
pub use log::*;
pub use terminal_io::*;
pub use terminal_session::*;
pub use test_fixtures::*;
