// ABOUTME: Layer construction for console, JSON and rolling file output
// ABOUTME: Layers are boxed so the subscriber can be assembled from configuration

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::LoggingConfig;

pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Console output: compact text, or JSON lines when requested
pub fn create_console_layer(config: &LoggingConfig) -> Option<BoxedLayer> {
    if !config.console {
        return None;
    }

    let layer = if config.json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).compact().boxed()
    };

    Some(layer)
}

/// Daily rolling file output.
///
/// The returned guard flushes the background writer when dropped and has to
/// outlive every log call that should reach the file.
pub fn create_file_layer(config: &LoggingConfig) -> Result<Option<(BoxedLayer, WorkerGuard)>> {
    if !config.file {
        return Ok(None);
    }

    let directory = config
        .file_path
        .parent()
        .context("Log file path has no parent directory")?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

    let file_name = config
        .file_path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Invalid log file path")?;

    let appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .boxed();

    Ok(Some((layer, guard)))
}

/// Build the level filter from the configuration
pub fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(config.filter_directives()).context("Invalid log filter directives")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use tempfile::tempdir;
    use tracing::Level;

    #[test]
    fn test_console_layer_respects_toggle() {
        let config = LoggingConfig {
            console: false,
            ..Default::default()
        };
        assert!(create_console_layer(&config).is_none());

        let config = LoggingConfig {
            json: true,
            ..Default::default()
        };
        assert!(create_console_layer(&config).is_some());
    }

    #[test]
    fn test_file_layer_creates_directory() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("nested").join("glance.log");
        let config = LoggingConfig {
            file_path: log_path,
            ..Default::default()
        };

        let layer = create_file_layer(&config).unwrap();
        assert!(layer.is_some());
        assert!(temp_dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_file_layer_disabled() {
        let config = LoggingConfig {
            file: false,
            ..Default::default()
        };
        assert!(create_file_layer(&config).unwrap().is_none());
    }

    #[test]
    fn test_create_env_filter() {
        let mut config = LoggingConfig {
            level: LogLevel(Level::DEBUG),
            ..Default::default()
        };
        config
            .module_levels
            .insert("glance_core".to_string(), LogLevel(Level::TRACE));

        let filter = create_env_filter(&config).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("glance_core=trace"));
    }
}
