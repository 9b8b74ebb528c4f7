//! Formatting of log entries into text lines
//!
//! The logger treats formatting as a capability: anything implementing
//! [`LogFormatter`] can turn a message, an optional error and an optional
//! trace into the lines the sink writes. Swapping formatters never changes
//! what the sink does with those lines.

mod traits;
mod pretty;
mod plain;

pub use traits::{LogFormatter, SharedFormatter};
pub use pretty::PrettyFormatter;
pub use plain::PlainFormatter;
