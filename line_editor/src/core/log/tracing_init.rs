// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{DisplayPreference, TracingConfig};
use crate::ok;
use miette::IntoDiagnostic;
use std::path::Path;
use tracing::dispatcher;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Layers for `tracing_config`, or [None] when it turns logging off.
///
/// # Errors
///
/// Returns an error if the log file can't be opened.
pub fn try_create_layers(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<Vec<BoxedLayer>>> {
    let level = tracing_config.get_level_filter();
    if level == LevelFilter::OFF {
        return Ok(None);
    }

    let mut layers: Vec<BoxedLayer> = vec![Box::new(level)];
    if let Some(display) = tracing_config.display() {
        layers.push(display_layer(display, level));
    }
    if let Some(path) = tracing_config.file_path() {
        layers.push(try_file_layer(path, level)?);
    }
    Ok(Some(layers))
}

fn display_layer(display: DisplayPreference, level: LevelFilter) -> BoxedLayer {
    let fmt = tracing_subscriber::fmt::layer().with_target(false);
    match display {
        DisplayPreference::Stdout => {
            Box::new(fmt.with_writer(std::io::stdout).with_filter(level))
        }
        DisplayPreference::Stderr => {
            Box::new(fmt.with_writer(std::io::stderr).with_filter(level))
        }
    }
}

/// Appends to `path` without rolling over. The parent folder must already exist.
fn try_file_layer(path: &str, level: LevelFilter) -> miette::Result<BoxedLayer> {
    let path = Path::new(path);
    let (Some(folder), Some(file_name)) = (path.parent(), path.file_name()) else {
        miette::bail!("log file path {} has no folder or file name", path.display());
    };
    if !folder.as_os_str().is_empty() && !folder.is_dir() {
        miette::bail!("log folder {} does not exist", folder.display());
    }
    let writer = tracing_appender::rolling::never(folder, file_name);
    Ok(Box::new(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(level),
    ))
}

/// Install the process wide subscriber. Does nothing when logging is off.
///
/// # Errors
///
/// Returns an error if the log file can't be opened or a global subscriber is already
/// installed.
pub fn try_initialize_logging_global(tracing_config: &TracingConfig) -> miette::Result<()> {
    if let Some(layers) = try_create_layers(tracing_config)? {
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .into_diagnostic()?;
    }
    ok!()
}

/// Like [`try_initialize_logging_global`] but scoped to the current thread until the
/// guard drops. Used by tests.
///
/// # Errors
///
/// Returns an error if the log file can't be opened.
pub fn try_initialize_logging_thread_local(
    tracing_config: &TracingConfig,
) -> miette::Result<Option<dispatcher::DefaultGuard>> {
    Ok(try_create_layers(tracing_config)?.map(|layers| {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(layers))
    }))
}
