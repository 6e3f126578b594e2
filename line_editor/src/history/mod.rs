// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Command history. The editor only talks to a [`HistoryStore`]: it asks for the next
//! sequence number when a read starts, appends accepted lines, and walks or lists past
//! commands in the history modes.

// Attach.
pub mod file_history;
pub mod history_store;
pub mod in_memory_history;

// Re-export.
pub use file_history::*;
pub use history_store::*;
pub use in_memory_history::*;
