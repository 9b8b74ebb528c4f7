//! Stderr diagnostics

use super::traits::{Diagnostic, DiagnosticLevel, Diagnostics};

/// Prints diagnostics at or above a threshold to stderr
///
/// The default threshold is `Warn`, so routine events such as the log file
/// being opened stay quiet.
#[derive(Debug, Clone)]
pub struct StderrDiagnostics {
    min_level: DiagnosticLevel,
}

impl Default for StderrDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl StderrDiagnostics {
    pub fn new() -> Self {
        Self {
            min_level: DiagnosticLevel::Warn,
        }
    }

    pub fn with_min_level(mut self, level: DiagnosticLevel) -> Self {
        self.min_level = level;
        self
    }

    fn line(&self, diagnostic: &Diagnostic) -> Option<String> {
        if diagnostic.level < self.min_level {
            return None;
        }
        let mut line = format!("[elog] {} {}", diagnostic.level, diagnostic);
        // Open/write errors already name the file in their message
        if let Some(path) = &diagnostic.path {
            let shown = path.display().to_string();
            if !diagnostic.message.contains(&shown) {
                line.push_str(&format!(" ({})", shown));
            }
        }
        Some(line)
    }
}

impl Diagnostics for StderrDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        if let Some(line) = self.line(&diagnostic) {
            eprintln!("{}", line);
        }
    }
}
