//! File + console output sink
//!
//! The sink owns the append handle to the log file. It is always used behind
//! the logger's async mutex, so `emit` calls never interleave on a handle.

use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::console::SharedConsole;
use crate::diagnostics::{Diagnostic, DiagnosticLevel, Operation, SharedDiagnostics};
use crate::error::{LogError, LogResult};

/// Fans formatted lines out to the console and/or the log file
pub struct OutputSink {
    log_file_path: PathBuf,
    write_to_file: bool,
    write_to_console: bool,
    console: SharedConsole,
    diagnostics: SharedDiagnostics,
    file: Option<File>,
    /// Cleared when opening failed or after teardown
    file_enabled: bool,
}

impl OutputSink {
    /// Create a sink; no file is touched until [`initialize`](Self::initialize)
    pub fn new(
        log_file_path: impl Into<PathBuf>,
        write_to_file: bool,
        write_to_console: bool,
        console: SharedConsole,
        diagnostics: SharedDiagnostics,
    ) -> Self {
        Self {
            log_file_path: log_file_path.into(),
            write_to_file,
            write_to_console,
            console,
            diagnostics,
            file: None,
            file_enabled: write_to_file,
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_file_path
    }

    /// Whether a file handle is currently open
    pub fn is_file_open(&self) -> bool {
        self.file.is_some()
    }

    /// Prepare the log file for append
    ///
    /// Creates the parent directory and opens the file if it already exists.
    /// A missing file is created by the first `emit`, so nothing appears on
    /// disk until something is logged. Existing content is never truncated.
    /// On failure the sink stays without a file handle and only console output
    /// (if enabled) happens.
    pub async fn initialize(&mut self) -> LogResult<()> {
        if !self.write_to_file {
            return Ok(());
        }
        self.file = None;
        self.file_enabled = false;
        ensure_parent_dir(&self.log_file_path).await?;
        if fs::metadata(&self.log_file_path).await.is_ok() {
            self.file = Some(open_append(&self.log_file_path).await?);
            self.diagnostics.report(
                Diagnostic::new(DiagnosticLevel::Debug, Operation::Open, "log file opened")
                    .with_path(&self.log_file_path),
            );
        }
        self.file_enabled = true;
        Ok(())
    }

    /// Drop the current handle and open the file again
    ///
    /// Called after the file was deleted and recreated out-of-band so writes
    /// land in the new file.
    pub async fn reopen(&mut self) -> LogResult<()> {
        if let Some(mut file) = self.file.take() {
            // Already closed or deleted underneath us; nothing to keep
            let _ = file.flush().await;
        }
        self.initialize().await
    }

    /// Write one entry's lines to every enabled destination
    ///
    /// File lines are flushed before this returns. A file failure is reported
    /// to diagnostics and never stops console output.
    pub async fn emit(&mut self, lines: &[String]) {
        if self.write_to_console {
            for line in lines {
                self.console.print(line);
            }
        }

        if !self.write_to_file || !self.file_enabled {
            return;
        }
        if self.file.is_none() {
            match open_append(&self.log_file_path).await {
                Ok(file) => self.file = Some(file),
                Err(e) => {
                    self.file_enabled = false;
                    self.diagnostics
                        .report(Diagnostic::from_error(DiagnosticLevel::Error, Operation::Open, &e));
                    return;
                }
            }
        }
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(e) = append_lines(file, lines).await {
            self.report_write_failure(e);
        }
    }

    /// Flush and close the file handle; safe to call more than once
    pub async fn teardown(&mut self) {
        self.file_enabled = false;
        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.flush().await {
                self.report_write_failure(e);
            }
        }
    }

    fn report_write_failure(&self, source: std::io::Error) {
        let err = LogError::write(&self.log_file_path, source);
        self.diagnostics
            .report(Diagnostic::from_error(DiagnosticLevel::Error, Operation::Write, &err));
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("log_file_path", &self.log_file_path)
            .field("write_to_file", &self.write_to_file)
            .field("write_to_console", &self.write_to_console)
            .field("file_open", &self.is_file_open())
            .finish()
    }
}

async fn ensure_parent_dir(path: &Path) -> LogResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .await
            .map_err(|e| LogError::open(path, e)),
        _ => Ok(()),
    }
}

async fn open_append(path: &Path) -> LogResult<File> {
    ensure_parent_dir(path).await?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| LogError::open(path, e))
}

async fn append_lines(file: &mut File, lines: &[String]) -> std::io::Result<()> {
    let mut buf = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        buf.push_str(line);
        buf.push('\n');
    }
    file.write_all(buf.as_bytes()).await?;
    file.flush().await
}
