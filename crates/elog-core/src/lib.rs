//! elog Core
//!
//! A small dual-sink logger. Entries are formatted, timestamped and written to
//! the console and/or an append-only text file in the user's documents
//! directory. Logging never fails from the caller's point of view: problems
//! inside the logger are reported through a [`Diagnostics`] channel.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use elog_core::{Logger, LoggerConfig};
//!
//! let logger = Logger::new(LoggerConfig::default());
//! logger.debug("service started", None).await;
//! logger.error("timeout", Some("fetching profile".into()), None).await;
//!
//! // Hand the file to a bug report, then start over
//! let file = logger.get_log_file().await;
//! logger.clear_log_file().await?;
//! ```
//!
//! ## Collaborators
//!
//! The pieces around the sink are traits so hosts can swap them:
//! - [`DocumentsResolver`]: where the log file lives
//! - [`Console`]: where console lines go
//! - [`LogFormatter`]: how an entry becomes lines
//! - [`Diagnostics`]: where the logger's own failures go

pub mod error;
pub mod config;
pub mod value;
pub mod stack;
pub mod format;
pub mod diagnostics;
pub mod sink;
pub mod paths;
pub mod barrier;
pub mod logger;

pub use error::{LogError, LogResult};
pub use config::{LoggerConfig, DEFAULT_LOG_FILE_NAME, DEFAULT_ERROR_STACK_DEPTH};
pub use value::LogValue;
pub use stack::{StackTrace, StackFrame};
pub use format::{LogFormatter, SharedFormatter, PrettyFormatter, PlainFormatter};
pub use diagnostics::{
    Diagnostic, DiagnosticLevel, Diagnostics, Operation, SharedDiagnostics,
    StderrDiagnostics, MemoryDiagnostics,
};
pub use sink::{Console, SharedConsole, StdoutConsole, MemoryConsole, OutputSink};
pub use paths::{DocumentsResolver, PlatformDocuments, FixedDirectory};
pub use barrier::{init_barrier, InitBarrier, InitSignal};
pub use logger::{Logger, LoggerBuilder, format_timestamp};
