//! Formatter trait definition

use std::sync::Arc;

use crate::stack::StackTrace;

/// Turns one log entry into the lines handed to the sink
///
/// Implementations:
/// - `PrettyFormatter`: boxed layout with a depth-limited trace
/// - `PlainFormatter`: undecorated lines
pub trait LogFormatter: Send + Sync {
    /// Format an entry
    ///
    /// `message` is the already timestamped header line. `error` is the
    /// rendered error payload, if any.
    fn format(&self, message: &str, error: Option<&str>, stack_trace: Option<&StackTrace>) -> Vec<String>;
}

/// Type alias for an Arc-wrapped formatter
pub type SharedFormatter = Arc<dyn LogFormatter>;
