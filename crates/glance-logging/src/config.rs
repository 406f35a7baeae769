// ABOUTME: Logging configuration and environment variable overrides
// ABOUTME: Handles log levels, output targets and the log file location

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::Level;

/// Wrapper for tracing::Level that serializes as a lowercase name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogLevel(pub Level);

impl TryFrom<String> for LogLevel {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        parse_log_level(&value).map(LogLevel)
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.0.as_str().to_lowercase()
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        LogLevel(level)
    }
}

/// Logging configuration for glance hosts and tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level
    pub level: LogLevel,

    /// Per-target overrides, e.g. `glance_core::coordinator = "trace"`
    #[serde(default)]
    pub module_levels: BTreeMap<String, LogLevel>,

    /// Write human readable output to stdout
    pub console: bool,

    /// Write to a daily rolling log file
    pub file: bool,

    /// Emit JSON lines instead of plain text on the console
    pub json: bool,

    /// Log file location (defaults to ~/.config/glance/glance.log)
    pub file_path: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(Level::INFO),
            module_levels: BTreeMap::new(),
            console: true,
            file: true,
            json: false,
            file_path: default_log_file_path(),
        }
    }
}

impl LoggingConfig {
    /// Default configuration with overrides taken from the process environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// `GLANCE_LOG` wins over `RUST_LOG`; the remaining variables only need
    /// to be present.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("GLANCE_LOG") {
            self.level = LogLevel(parse_log_level(&level).context("Invalid GLANCE_LOG level")?);
        } else if let Some(directives) = lookup("RUST_LOG") {
            self.apply_directives(&directives)?;
        }

        if lookup("GLANCE_LOG_JSON").is_some() {
            self.json = true;
        }
        if lookup("GLANCE_LOG_NO_CONSOLE").is_some() {
            self.console = false;
        }
        if lookup("GLANCE_LOG_NO_FILE").is_some() {
            self.file = false;
        }

        Ok(())
    }

    /// Parse `RUST_LOG` style directives ("info,glance_core=debug").
    fn apply_directives(&mut self, directives: &str) -> Result<()> {
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((target, level)) => {
                    let level = parse_log_level(level)
                        .with_context(|| format!("Invalid log level for target '{target}'"))?;
                    self.module_levels.insert(target.to_string(), LogLevel(level));
                }
                None => {
                    self.level = LogLevel(
                        parse_log_level(directive)
                            .with_context(|| format!("Invalid global log level '{directive}'"))?,
                    );
                }
            }
        }
        Ok(())
    }

    /// Filter directive string understood by `EnvFilter`
    pub fn filter_directives(&self) -> String {
        let mut directives = vec![String::from(self.level)];
        directives.extend(
            self.module_levels
                .iter()
                .map(|(target, level)| format!("{target}={}", String::from(*level))),
        );
        directives.join(",")
    }
}

fn default_log_file_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("glance").join("glance.log"))
        .unwrap_or_else(|| PathBuf::from("glance.log"))
}

/// Parse a log level string (case-insensitive).
pub fn parse_log_level(value: &str) -> Result<Level> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Invalid log level: {value}. Must be one of: trace, debug, info, warn, error"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level.0, Level::INFO);
        assert!(config.console);
        assert!(config.file);
        assert!(!config.json);
        assert!(config.file_path.to_string_lossy().ends_with("glance.log"));
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level(" Warning ").unwrap(), Level::WARN);
        assert!(parse_log_level("loud").is_err());
    }

    #[test]
    fn test_glance_log_wins_over_rust_log() {
        let mut config = LoggingConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("GLANCE_LOG", "debug"),
                ("RUST_LOG", "error,glance_core=trace"),
            ]))
            .unwrap();

        assert_eq!(config.level.0, Level::DEBUG);
        assert!(config.module_levels.is_empty());
    }

    #[test]
    fn test_rust_log_directives() {
        let mut config = LoggingConfig::default();
        config
            .apply_overrides(lookup_from(&[(
                "RUST_LOG",
                "warn, glance_core::coordinator=trace,glance_core=debug",
            )]))
            .unwrap();

        assert_eq!(config.level.0, Level::WARN);
        assert_eq!(
            config.module_levels.get("glance_core::coordinator"),
            Some(&LogLevel(Level::TRACE))
        );
        assert_eq!(
            config.filter_directives(),
            "warn,glance_core=debug,glance_core::coordinator=trace"
        );
    }

    #[test]
    fn test_output_toggles() {
        let mut config = LoggingConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("GLANCE_LOG_NO_FILE", "1"),
                ("GLANCE_LOG_JSON", ""),
            ]))
            .unwrap();

        assert!(!config.file);
        assert!(config.console);
        assert!(config.json);
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let mut config = LoggingConfig::default();
        let result = config.apply_overrides(lookup_from(&[("GLANCE_LOG", "shouty")]));
        assert!(result.is_err());
    }
}
