// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words rprompt

//! `rle` reads lines with the editor until end of input and echoes each one back.
//! Try `Tab` to complete, `Up` to walk history, `Ctrl-R` to list it and `Ctrl-N` to
//! browse the current directory.

use clap::Parser;
use r3bl_line_editor::{Editor, EditorConfig, LineRead, try_initialize_logging_global};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(bin_name = "rle")]
#[command(about = "Read lines with a modal, live checked line editor and echo them")]
#[command(version)]
#[command(next_line_help = true)]
/// More info: <https://docs.rs/clap/latest/clap/_derive/#overview>
pub struct CLIArg {
    #[arg(long, short = 'c', help = "Config file, defaults to the user config dir")]
    pub config: Option<PathBuf>,

    #[arg(long, short = 'p', help = "Prompt shown before the line")]
    pub prompt: Option<String>,

    #[arg(long, help = "Keep history in this file instead of in memory")]
    pub history_file: Option<PathBuf>,

    #[arg(long, help = "One of off, error, warn, info, debug, trace")]
    pub log_level: Option<String>,

    #[arg(long, help = "Write logs to this file, logging is off without it")]
    pub log_file: Option<PathBuf>,
}

impl CLIArg {
    /// Load the config file, then apply the flags on top of it.
    fn try_into_config(self) -> miette::Result<EditorConfig> {
        let mut config = match self.config.or_else(EditorConfig::default_path) {
            Some(path) => EditorConfig::try_load(&path)?,
            None => EditorConfig::default(),
        };
        if let Some(prompt) = self.prompt {
            config.prompt = prompt;
        }
        if let Some(history_file) = self.history_file {
            config.history_file = Some(history_file);
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = Some(log_file);
        }
        Ok(config)
    }
}

#[tokio::main]
#[allow(clippy::needless_return)]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();
    let config = cli_arg.try_into_config()?;

    try_initialize_logging_global(&config.tracing_config()?)?;
    // % is Display, ? is Debug.
    tracing::info!(message = "Start logging...", config = ?config);

    let mut editor = Editor::try_from_config(&config)?;
    loop {
        match editor.read_line().await {
            LineRead::Line(line) => println!("{line}"),
            LineRead::Eof => break,
            LineRead::Error(err) => {
                tracing::error!(message = "read failed", ?err);
                return Err(err.into());
            }
        }
    }

    tracing::info!(message = "Stop logging...");
    Ok(())
}
