//! Diagnostics channel for the logger's own failures
//!
//! The logger never raises into the host application. When initialization
//! fails, a write to the log file fails, or queued entries cannot be
//! delivered, a [`Diagnostic`] naming the operation (and the file, when one is
//! involved) is reported here.

mod traits;
mod stderr;
mod memory;

pub use traits::{Diagnostic, DiagnosticLevel, Diagnostics, Operation, SharedDiagnostics};
pub use stderr::StderrDiagnostics;
pub use memory::MemoryDiagnostics;
