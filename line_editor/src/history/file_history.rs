// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{HistoryEntry, HistoryStore, InMemoryHistory};
use miette::{IntoDiagnostic, WrapErr};
use std::{fs::OpenOptions,
          io::Write,
          path::{Path, PathBuf}};

/// History persisted as JSON lines, one [`HistoryEntry`] per line. The file is only ever
/// appended to; the in memory view is bounded by `max_size`.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
    memory: InMemoryHistory,
}

impl FileHistory {
    /// Load `path` if it exists. Lines that don't parse are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but can't be read.
    pub fn try_open(path: impl Into<PathBuf>, max_size: usize) -> miette::Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("can't read history file {}", path.display()))?;
            parse_entries(&content)
        } else {
            vec![]
        };
        tracing::debug!(message = "history loaded", ?path, count = entries.len());
        Ok(Self {
            memory: InMemoryHistory::with_entries(max_size, entries),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }
}

fn parse_entries(content: &str) -> Vec<HistoryEntry> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<HistoryEntry>(line) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(message = "skipping malformed history line", ?err);
                None
            }
        })
        .collect()
}

impl HistoryStore for FileHistory {
    fn next_sequence_number(&self) -> miette::Result<i64> {
        self.memory.next_sequence_number()
    }

    fn append(&self, line: &str) -> miette::Result<()> {
        let Some(entry) = self.memory.push_line(line) else {
            return Ok(());
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .into_diagnostic()
            .wrap_err_with(|| format!("can't open history file {}", self.path.display()))?;
        let json = serde_json::to_string(&entry).into_diagnostic()?;
        writeln!(file, "{json}").into_diagnostic()
    }

    fn last_command(&self, before_seq: i64, prefix: &str) -> Option<HistoryEntry> {
        self.memory.last_command(before_seq, prefix)
    }

    fn next_command(&self, after_seq: i64, prefix: &str) -> Option<HistoryEntry> {
        self.memory.next_command(after_seq, prefix)
    }

    fn all_commands(&self) -> Vec<HistoryEntry> { self.memory.all_commands() }
}
