// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words rprompt

use crate::{TracingConfig, WriterConfig};
use miette::{IntoDiagnostic, WrapErr};
use serde::{Deserialize, Serialize};
use std::{path::{Path, PathBuf},
          str::FromStr};

pub const CONFIG_FOLDER_NAME: &str = "r3bl_line_editor";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_HISTORY_MAX_SIZE: usize = 1_000;

/// How diagnostics positioned exactly at the end of the buffer are treated. The
/// programmatic form, with support for a custom predicate, is
/// [`crate::DiagnosticPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticPolicySetting {
    /// Assume the user is still typing and hide them.
    #[default]
    SuppressAtEndOfBuffer,
    ReportAll,
}

/// User settings, stored as JSON. Missing fields take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub prompt: String,
    pub rprompt: String,
    pub history_max_size: usize,
    /// In memory history only when [None].
    pub history_file: Option<PathBuf>,
    pub diagnostic_policy: DiagnosticPolicySetting,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    /// Logging is disabled when [None], stdout belongs to the editor.
    pub log_file: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            rprompt: String::new(),
            history_max_size: DEFAULT_HISTORY_MAX_SIZE,
            history_file: None,
            diagnostic_policy: DiagnosticPolicySetting::default(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl EditorConfig {
    /// `<config dir>/r3bl_line_editor/config.json`, eg:
    /// `~/.config/r3bl_line_editor/config.json` on Linux.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|it| it.join(CONFIG_FOLDER_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the config at `path`, or the defaults if there is no file there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but can't be read or isn't valid JSON.
    pub fn try_load(path: &Path) -> miette::Result<Self> {
        if !path.exists() {
            tracing::debug!(message = "no config file, using defaults", ?path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("can't read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .into_diagnostic()
            .wrap_err_with(|| format!("malformed config file {}", path.display()))
    }

    /// # Errors
    ///
    /// Returns an error if the parent folder can't be created or the file can't be
    /// written.
    pub fn try_save(&self, path: &Path) -> miette::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
        let content = serde_json::to_string_pretty(self).into_diagnostic()?;
        std::fs::write(path, content).into_diagnostic()
    }

    /// [None] means logging is turned off.
    ///
    /// # Errors
    ///
    /// Returns an error if `log_level` is not a known level.
    pub fn log_level(&self) -> miette::Result<Option<tracing::Level>> {
        if self.log_level.eq_ignore_ascii_case("off") {
            return Ok(None);
        }
        tracing::Level::from_str(&self.log_level)
            .map(Some)
            .map_err(|_| miette::miette!("unknown log level: {}", self.log_level))
    }

    /// # Errors
    ///
    /// Returns an error if `log_level` is not a known level.
    pub fn tracing_config(&self) -> miette::Result<TracingConfig> {
        let level = self.log_level()?;
        let writer_config = match (level, &self.log_file) {
            (Some(_), Some(path)) => {
                WriterConfig::File(path.to_string_lossy().into_owned())
            }
            _ => WriterConfig::None,
        };
        Ok(TracingConfig {
            writer_config,
            level: level.unwrap_or(tracing::Level::INFO),
        })
    }
}
