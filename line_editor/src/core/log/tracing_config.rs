// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

pub const DEFAULT_LOG_FILE_NAME: &str = "r3bl_line_editor.log";

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level: tracing::Level,
}

#[derive(Debug, Clone)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String /* tracing_log_file_path */),
    DisplayAndFile(DisplayPreference, String /* tracing_log_file_path */),
}

/// Stdout is shared with the editor's own rendering, so prefer stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

impl TracingConfig {
    #[must_use]
    pub fn new_file(filename: Option<String>, level: tracing::Level) -> Self {
        Self {
            writer_config: WriterConfig::File(
                filename.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level,
        }
    }

    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference, level: tracing::Level) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level,
        }
    }

    /// Stderr or stdout, if the log should also be shown.
    #[must_use]
    pub fn display(&self) -> Option<DisplayPreference> {
        match &self.writer_config {
            WriterConfig::Display(it) | WriterConfig::DisplayAndFile(it, _) => Some(*it),
            WriterConfig::None | WriterConfig::File(_) => None,
        }
    }

    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        match &self.writer_config {
            WriterConfig::File(it) | WriterConfig::DisplayAndFile(_, it) => Some(it),
            WriterConfig::None | WriterConfig::Display(_) => None,
        }
    }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter {
        match self.writer_config {
            WriterConfig::None => LevelFilter::OFF,
            _ => LevelFilter::from_level(self.level),
        }
    }
}
