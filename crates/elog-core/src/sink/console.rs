//! Console destinations

use std::sync::Arc;

use parking_lot::Mutex;

/// The debug-print primitive the sink writes console lines to
pub trait Console: Send + Sync {
    /// Print one line
    fn print(&self, line: &str);
}

/// Type alias for an Arc-wrapped console
pub type SharedConsole = Arc<dyn Console>;

/// Console that prints to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutConsole;

impl StdoutConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdoutConsole {
    fn print(&self, line: &str) {
        println!("{}", line);
    }
}

/// Console that captures lines in memory
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<String>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every printed line
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// All printed lines joined with `\n`
    pub fn contents(&self) -> String {
        self.lines.lock().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl Console for MemoryConsole {
    fn print(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}
