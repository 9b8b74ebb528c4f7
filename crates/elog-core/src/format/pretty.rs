//! Boxed "pretty" formatter
//!
//! Produces output like:
//!
//! ```text
//! ┌──────────────────────────────
//! │ 14-03 09:26:53 [ERROR] saving
//! ├┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄
//! │ permission denied
//! ├┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄
//! │ #0   my_app::save (src/save.rs:10:5)
//! └──────────────────────────────
//! ```

use super::traits::LogFormatter;
use crate::config::DEFAULT_ERROR_STACK_DEPTH;
use crate::stack::StackTrace;

const TOP_LEFT: char = '┌';
const BOTTOM_LEFT: char = '└';
const MIDDLE_LEFT: char = '├';
const VERTICAL: &str = "│ ";
const DOUBLE_DIVIDER: char = '─';
const SINGLE_DIVIDER: char = '┄';

const DEFAULT_LINE_LENGTH: usize = 80;

/// Boxed formatter with a depth-limited stack trace section
#[derive(Debug, Clone)]
pub struct PrettyFormatter {
    stack_depth: usize,
    line_length: usize,
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_STACK_DEPTH)
    }
}

impl PrettyFormatter {
    /// Create a formatter printing at most `stack_depth` frames
    pub fn new(stack_depth: usize) -> Self {
        Self {
            stack_depth,
            line_length: DEFAULT_LINE_LENGTH,
        }
    }

    /// Width of the border lines
    pub fn with_line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length.max(2);
        self
    }

    fn border(&self, corner: char, fill: char) -> String {
        let mut line = String::with_capacity(self.line_length * 3);
        line.push(corner);
        line.extend(std::iter::repeat(fill).take(self.line_length - 1));
        line
    }

    fn section(out: &mut Vec<String>, text: impl IntoIterator<Item = impl AsRef<str>>) {
        for line in text {
            out.push(format!("{}{}", VERTICAL, line.as_ref()));
        }
    }
}

impl LogFormatter for PrettyFormatter {
    fn format(&self, message: &str, error: Option<&str>, stack_trace: Option<&StackTrace>) -> Vec<String> {
        let divider = self.border(MIDDLE_LEFT, SINGLE_DIVIDER);
        let mut out = vec![self.border(TOP_LEFT, DOUBLE_DIVIDER)];

        if message.is_empty() {
            Self::section(&mut out, [""]);
        } else {
            Self::section(&mut out, message.lines());
        }

        if let Some(error) = error {
            out.push(divider.clone());
            Self::section(&mut out, error.lines());
        }

        let frames = stack_trace.map(|t| t.render(self.stack_depth)).unwrap_or_default();
        if !frames.is_empty() {
            out.push(divider);
            Self::section(&mut out, frames);
        }

        out.push(self.border(BOTTOM_LEFT, DOUBLE_DIVIDER));
        out
    }
}
