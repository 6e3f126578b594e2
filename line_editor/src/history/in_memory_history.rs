// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{HistoryEntry, HistoryStore};
use crate::{DEFAULT_HISTORY_MAX_SIZE, StdMutex, lock_or_panic, ok};
use std::collections::VecDeque;

/// Bounded history kept in memory. Once `max_size` entries are stored the oldest one is
/// evicted for every new entry.
#[derive(Debug)]
pub struct InMemoryHistory {
    inner: StdMutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Oldest first.
    entries: VecDeque<HistoryEntry>,
    next_seq: i64,
    max_size: usize,
}

impl Default for InMemoryHistory {
    fn default() -> Self { Self::new(DEFAULT_HISTORY_MAX_SIZE) }
}

impl InMemoryHistory {
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: StdMutex::new(Inner {
                entries: VecDeque::new(),
                next_seq: 1,
                max_size,
            }),
        }
    }

    /// Seed the history with entries loaded from elsewhere, oldest first. Sequence
    /// numbers continue after the largest one seen.
    #[must_use]
    pub fn with_entries(max_size: usize, entries: Vec<HistoryEntry>) -> Self {
        let it = Self::new(max_size);
        {
            let mut inner = lock_or_panic!(it.inner);
            for entry in entries {
                inner.next_seq = inner.next_seq.max(entry.seq + 1);
                inner.push(entry);
            }
        }
        it
    }

    /// Add `line` and return the stored entry, or [None] when it was skipped.
    pub fn push_line(&self, line: &str) -> Option<HistoryEntry> {
        let mut inner = lock_or_panic!(self.inner);
        // Don't add entry if last entry was same, or line was empty.
        if line.is_empty() || inner.entries.back().map(|it| it.text.as_str()) == Some(line)
        {
            return None;
        }
        let entry = HistoryEntry {
            seq: inner.next_seq,
            text: line.to_string(),
        };
        inner.next_seq += 1;
        inner.push(entry.clone());
        Some(entry)
    }

    #[must_use]
    pub fn len(&self) -> usize { lock_or_panic!(self.inner).entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Inner {
    fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }
}

impl HistoryStore for InMemoryHistory {
    fn next_sequence_number(&self) -> miette::Result<i64> {
        ok!(lock_or_panic!(self.inner).next_seq)
    }

    fn append(&self, line: &str) -> miette::Result<()> {
        self.push_line(line);
        ok!()
    }

    fn last_command(&self, before_seq: i64, prefix: &str) -> Option<HistoryEntry> {
        lock_or_panic!(self.inner)
            .entries
            .iter()
            .rev()
            .find(|it| it.seq < before_seq && it.text.starts_with(prefix))
            .cloned()
    }

    fn next_command(&self, after_seq: i64, prefix: &str) -> Option<HistoryEntry> {
        lock_or_panic!(self.inner)
            .entries
            .iter()
            .find(|it| it.seq > after_seq && it.text.starts_with(prefix))
            .cloned()
    }

    fn all_commands(&self) -> Vec<HistoryEntry> {
        lock_or_panic!(self.inner).entries.iter().cloned().collect()
    }
}
