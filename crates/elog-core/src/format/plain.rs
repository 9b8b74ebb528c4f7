//! Undecorated formatter

use super::traits::LogFormatter;
use crate::config::DEFAULT_ERROR_STACK_DEPTH;
use crate::stack::StackTrace;

/// Writes the message, the error and the trace frames as bare lines
#[derive(Debug, Clone, Copy)]
pub struct PlainFormatter {
    stack_depth: usize,
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_STACK_DEPTH)
    }
}

impl PlainFormatter {
    pub fn new(stack_depth: usize) -> Self {
        Self { stack_depth }
    }
}

impl LogFormatter for PlainFormatter {
    fn format(&self, message: &str, error: Option<&str>, stack_trace: Option<&StackTrace>) -> Vec<String> {
        let mut lines: Vec<String> = message.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        if let Some(error) = error {
            lines.extend(error.lines().map(str::to_string));
        }
        if let Some(trace) = stack_trace {
            lines.extend(trace.render(self.stack_depth));
        }
        lines
    }
}
