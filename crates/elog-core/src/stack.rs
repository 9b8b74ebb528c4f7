//! Stack traces attached to log entries
//!
//! A [`StackTrace`] is either supplied by the caller or captured from the
//! ambient [`Backtrace`]. Ambient capture follows the standard library rules:
//! it only produces frames when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE`
//! enables it, and otherwise yields `None` so no trace lines are printed.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

/// Frames whose symbol starts with one of these are capture machinery, not caller code
const INTERNAL_PREFIXES: &[&str] = &["std::backtrace", "elog_core::"];

/// One frame of a stack trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Symbol name, e.g. `my_app::handler::run`
    pub function: String,
    /// Source location (`file:line:col`), when known
    pub location: Option<String>,
}

impl StackFrame {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} ({})", self.function, location),
            None => f.write_str(&self.function),
        }
    }
}

/// An ordered list of frames, innermost first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
    frames: Vec<StackFrame>,
}

impl StackTrace {
    pub fn new(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }

    /// Build a trace from plain text lines, one frame per line
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(lines.into_iter().map(StackFrame::new).collect())
    }

    /// Capture the current call stack, if the environment enables capture
    ///
    /// Frames belonging to the backtrace machinery and to this crate are
    /// dropped so the first frame is the caller's.
    pub fn capture() -> Option<Self> {
        let backtrace = Backtrace::capture();
        if backtrace.status() != BacktraceStatus::Captured {
            return None;
        }
        let trace = Self::parse(&backtrace.to_string());
        let frames: Vec<StackFrame> = trace
            .frames
            .into_iter()
            .skip_while(|frame| {
                INTERNAL_PREFIXES
                    .iter()
                    .any(|prefix| frame.function.starts_with(prefix))
            })
            .collect();
        Some(Self::new(frames))
    }

    /// Parse the text form of a [`Backtrace`]
    ///
    /// Each frame starts with `N: symbol`, optionally followed by an
    /// `at file:line:col` line.
    pub fn parse(text: &str) -> Self {
        let mut frames: Vec<StackFrame> = Vec::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if let Some(location) = trimmed.strip_prefix("at ") {
                if let Some(frame) = frames.last_mut() {
                    if frame.location.is_none() {
                        frame.location = Some(location.to_string());
                    }
                }
                continue;
            }
            if let Some((index, symbol)) = trimmed.split_once(": ") {
                if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
                    frames.push(StackFrame::new(symbol));
                }
            }
        }
        Self::new(frames)
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Render at most `depth` frames as `#i   frame` lines
    pub fn render(&self, depth: usize) -> Vec<String> {
        self.frames
            .iter()
            .take(depth)
            .enumerate()
            .map(|(i, frame)| format!("#{:<3} {}", i, frame))
            .collect()
    }
}
