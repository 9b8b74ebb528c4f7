//! Diagnostic events and the channel trait

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LogError;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Debug,
    Warn,
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticLevel::Debug => "DEBUG",
            DiagnosticLevel::Warn => "WARN",
            DiagnosticLevel::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// What the logger was doing when the event happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Resolving the path and building the sink
    Initialize,
    /// Opening or creating the log file
    Open,
    /// Appending to or flushing the log file
    Write,
    /// Resolving the log file path for `get_log_file`
    Locate,
    /// Handing queued entries to the sink
    Deliver,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Initialize => "initialize",
            Operation::Open => "open",
            Operation::Write => "write",
            Operation::Locate => "locate",
            Operation::Deliver => "deliver",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event reported by the logger about itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub operation: Operation,
    /// Log file involved, when there is one
    pub path: Option<PathBuf>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, operation: Operation, message: impl Into<String>) -> Self {
        Self {
            level,
            operation,
            path: None,
            message: message.into(),
        }
    }

    /// Build an event from a logger error, keeping the file path it carries
    pub fn from_error(level: DiagnosticLevel, operation: Operation, err: &LogError) -> Self {
        let path = match err {
            LogError::Open { path, .. } | LogError::Write { path, .. } => Some(path.clone()),
            _ => None,
        };
        Self {
            level,
            operation,
            path,
            message: err.to_string(),
        }
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.operation, self.message)
    }
}

/// Receiver for the logger's own failures
///
/// Implementations:
/// - `StderrDiagnostics`: prints to stderr above a threshold (the default)
/// - `MemoryDiagnostics`: records events, for tests and host UIs
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Type alias for an Arc-wrapped diagnostics sink
pub type SharedDiagnostics = Arc<dyn Diagnostics>;
