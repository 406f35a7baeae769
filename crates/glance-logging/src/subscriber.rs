// ABOUTME: Global tracing subscriber initialization
// ABOUTME: Combines the configured layers under one filter and installs them once

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{prelude::*, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::layers::{BoxedLayer, create_console_layer, create_env_filter, create_file_layer};

/// Keeps the background file writer alive; dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber for `config`.
pub fn init_subscriber(config: LoggingConfig) -> Result<LoggingGuard> {
    let env_filter = create_env_filter(&config)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if let Some(console) = create_console_layer(&config) {
        layers.push(console);
    }

    let mut file_guard = None;
    if let Some((file_layer, guard)) = create_file_layer(&config)? {
        layers.push(file_layer);
        file_guard = Some(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::info!(
        level = %config.level.0,
        console = config.console,
        file = config.file,
        json = config.json,
        file_path = %config.file_path.display(),
        "Glance logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
