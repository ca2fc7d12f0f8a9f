//! Logger configuration

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serializable logger settings
///
/// `color: None` means "color when the primary destination is a terminal".
///
/// # Example
///
/// ```
/// use color_logger::core::LoggerConfig;
///
/// let config = LoggerConfig::from_json(r#"{ "debug": true, "timestamp": false }"#).unwrap();
/// assert!(config.debug);
/// assert!(!config.timestamp);
/// assert_eq!(config.color, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub color: Option<bool>,
    pub debug: bool,
    pub timestamp: bool,
    pub quiet: bool,
    pub depth: usize,
    pub log_file: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            color: None,
            debug: false,
            timestamp: true,
            quiet: false,
            depth: 0,
            log_file: None,
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading logger config", path.display().to_string(), e)
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.log_file {
            if path.as_os_str().is_empty() {
                return Err(LoggerError::config("LoggerConfig", "log_file path is empty"));
            }
        }
        Ok(())
    }
}

/// Per-record settings, copied out of the logger under its lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) color: bool,
    pub(crate) debug: bool,
    pub(crate) timestamp: bool,
    pub(crate) quiet: bool,
    pub(crate) depth: usize,
}
