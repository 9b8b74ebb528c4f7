//! Output sink: fan-out of formatted lines to console and file

mod console;
mod output;

pub use console::{Console, SharedConsole, StdoutConsole, MemoryConsole};
pub use output::OutputSink;
