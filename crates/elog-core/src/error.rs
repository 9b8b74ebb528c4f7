//! Logger error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur inside the logging infrastructure
///
/// Logging calls themselves never return these; they are reported through
/// [`Diagnostics`](crate::diagnostics::Diagnostics) instead. Management
/// operations such as [`Logger::clear_log_file`](crate::Logger::clear_log_file)
/// return them directly.
#[derive(Error, Debug)]
pub enum LogError {
    /// Initialization did not complete successfully
    #[error("Logger initialization failed: {0}")]
    Initialization(String),

    /// The documents directory could not be resolved
    #[error("Documents directory unavailable: {0}")]
    DocumentsUnavailable(String),

    /// No async runtime was available to run initialization
    #[error("No async runtime available: {0}")]
    Runtime(String),

    /// The log file could not be opened or created
    #[error("Failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Appending to or flushing the log file failed
    #[error("Failed to write log file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogError {
    /// Create an open error
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a documents-unavailable error
    pub fn documents_unavailable(reason: impl Into<String>) -> Self {
        Self::DocumentsUnavailable(reason.into())
    }
}

pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_include_path() {
        let err = LogError::open(
            "/nope/elog.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let text = err.to_string();
        assert!(text.contains("/nope/elog.txt"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LogError = io.into();
        assert!(matches!(err, LogError::Io(_)));
    }
}
