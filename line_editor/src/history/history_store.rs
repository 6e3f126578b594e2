// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Sequence number used when the store can't hand out a real one. Walking backwards
/// from it starts at the newest entry.
pub const UNKNOWN_HISTORY_SEQ: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub seq: i64,
    pub text: String,
}

/// Persistent command history. Implementations must be safe to share between the editor
/// and whatever else records commands.
pub trait HistoryStore: Send + Sync {
    /// The sequence number the next appended command will get.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage is unavailable.
    fn next_sequence_number(&self) -> miette::Result<i64>;

    /// Record `line`. Empty lines and repeats of the newest entry are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the line can't be persisted.
    fn append(&self, line: &str) -> miette::Result<()>;

    /// The newest entry with a sequence number below `before_seq` that starts with
    /// `prefix`.
    fn last_command(&self, before_seq: i64, prefix: &str) -> Option<HistoryEntry>;

    /// The oldest entry with a sequence number above `after_seq` that starts with
    /// `prefix`.
    fn next_command(&self, after_seq: i64, prefix: &str) -> Option<HistoryEntry>;

    /// Every entry, oldest first.
    fn all_commands(&self) -> Vec<HistoryEntry>;
}

pub type SafeHistoryStore = Arc<dyn HistoryStore>;
