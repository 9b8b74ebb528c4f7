//! Logger configuration
//!
//! A [`LoggerConfig`] is built once and handed to the logger at construction.
//! It can come from code (builder methods), from YAML, or from the defaults
//! with environment overrides applied.

use std::env;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{LogError, LogResult};

/// Default log file name inside the documents directory
pub const DEFAULT_LOG_FILE_NAME: &str = "elog.txt";

/// Default number of stack frames printed for errors
pub const DEFAULT_ERROR_STACK_DEPTH: usize = 4;

/// Defaults with `ELOG_*` environment overrides, read once per process
static ENV_CONFIG: Lazy<LoggerConfig> = Lazy::new(|| LoggerConfig::default().with_env_overrides());

/// Immutable logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Append formatted lines to the log file
    pub write_to_file: bool,
    /// Print formatted lines to the console
    pub write_to_console: bool,
    /// Maximum number of trace frames the formatter prints
    pub error_stack_depth: usize,
    /// File name, joined onto the documents directory
    pub log_file_name: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            write_to_file: true,
            write_to_console: true,
            error_stack_depth: DEFAULT_ERROR_STACK_DEPTH,
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus `ELOG_*` environment overrides (cached for the process)
    pub fn from_env() -> Self {
        ENV_CONFIG.clone()
    }

    /// Parse a config from YAML; missing fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> LogResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| LogError::Config(format!("Failed to parse YAML: {}", e)))
    }

    pub fn with_write_to_file(mut self, enabled: bool) -> Self {
        self.write_to_file = enabled;
        self
    }

    pub fn with_write_to_console(mut self, enabled: bool) -> Self {
        self.write_to_console = enabled;
        self
    }

    pub fn with_error_stack_depth(mut self, depth: usize) -> Self {
        self.error_stack_depth = depth;
        self
    }

    pub fn with_log_file_name(mut self, name: impl Into<String>) -> Self {
        self.log_file_name = name.into();
        self
    }

    /// Apply `ELOG_WRITE_TO_FILE`, `ELOG_WRITE_TO_CONSOLE`,
    /// `ELOG_ERROR_STACK_DEPTH` and `ELOG_FILE_NAME`.
    ///
    /// Values that don't parse are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("ELOG_WRITE_TO_FILE").and_then(|v| parse_flag(&v)) {
            self.write_to_file = v;
        }
        if let Some(v) = lookup("ELOG_WRITE_TO_CONSOLE").and_then(|v| parse_flag(&v)) {
            self.write_to_console = v;
        }
        if let Some(v) = lookup("ELOG_ERROR_STACK_DEPTH").and_then(|v| v.trim().parse().ok()) {
            self.error_stack_depth = v;
        }
        if let Some(v) = lookup("ELOG_FILE_NAME").filter(|v| !v.trim().is_empty()) {
            self.log_file_name = v;
        }
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
