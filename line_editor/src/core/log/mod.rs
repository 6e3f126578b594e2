// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Logging via [`tracing`]. The editor owns stdout while a line is being read, so the
//! default writer is a log file; display output goes to stderr only on request.

// Attach.
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use tracing_config::*;
pub use tracing_init::*;
