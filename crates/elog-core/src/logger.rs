//! The logger facade
//!
//! [`Logger`] is the public entry point. Construction returns immediately and
//! initialization (resolving the documents directory and preparing the
//! output sink) runs on a spawned task. Every logging call waits on the
//! initialization barrier before it touches the sink.
//!
//! ## Ordering
//!
//! `debug` and `error` are plain functions returning a future. The entry is
//! formatted and queued when the function is *called*; the returned future
//! then waits for initialization and drains the queue into the sink. Entries
//! therefore reach each destination in call order, even when several futures
//! are awaited concurrently or out of order.
//!
//! A future that is dropped without being awaited leaves its entry queued. It
//! is written by the next call that drains the queue, or when the logger
//! itself is dropped, which spawns a final drain on the runtime the logger was
//! built on. Entries that can never be written are reported to diagnostics.
//!
//! ```no_run
//! use elog_core::{Logger, LoggerConfig, LogValue};
//!
//! # async fn run() {
//! let logger = Logger::new(LoggerConfig::default().with_log_file_name("app.txt"));
//! logger.debug("starting", None).await;
//! logger.debug(vec![1, 2, 3], None).await;
//!
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! logger.error_from(&err, Some("saving".into()), None).await;
//! logger.error(LogValue::mapping([("code", 507)]), None, None).await;
//!
//! if let Some(path) = logger.get_log_file().await {
//!     println!("log written to {}", path.display());
//! }
//! # }
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::fs;

use crate::barrier::{init_barrier, InitBarrier};
use crate::config::LoggerConfig;
use crate::diagnostics::{Diagnostic, DiagnosticLevel, Operation, SharedDiagnostics, StderrDiagnostics};
use crate::error::{LogError, LogResult};
use crate::format::{PrettyFormatter, SharedFormatter};
use crate::paths::{resolve_log_file_path, DocumentsResolver, FixedDirectory, PlatformDocuments};
use crate::sink::{OutputSink, SharedConsole, StdoutConsole};
use crate::stack::StackTrace;
use crate::value::LogValue;

/// Timestamp prefix layout: `DD-MM HH:MM:SS`
const TIMESTAMP_FORMAT: &str = "%d-%m %H:%M:%S";

const ERROR_TAG: &str = "[ERROR]";

/// Format the timestamp prefix for a log line
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// State shared with the initialization task
struct Inner {
    config: LoggerConfig,
    documents: Arc<dyn DocumentsResolver>,
    console: SharedConsole,
    diagnostics: SharedDiagnostics,
    barrier: InitBarrier,
    /// `None` until initialization finishes, and again after shutdown
    sink: tokio::sync::Mutex<Option<OutputSink>>,
    /// Formatted entries in call order, waiting for the sink
    pending: Mutex<VecDeque<Vec<String>>>,
}

impl Inner {
    async fn initialize(&self) -> LogResult<()> {
        let path = resolve_log_file_path(self.documents.as_ref(), &self.config.log_file_name).await?;

        let mut sink = OutputSink::new(
            path,
            self.config.write_to_file,
            self.config.write_to_console,
            self.console.clone(),
            self.diagnostics.clone(),
        );
        if let Err(e) = sink.initialize().await {
            // Console output continues without the file
            self.diagnostics
                .report(Diagnostic::from_error(DiagnosticLevel::Error, Operation::Open, &e));
        }

        *self.sink.lock().await = Some(sink);
        Ok(())
    }

    /// Drop every queued entry, returning how many there were
    fn discard_pending(&self) -> usize {
        let mut pending = self.pending.lock();
        let count = pending.len();
        pending.clear();
        count
    }

    fn report_dropped(&self, count: usize, reason: impl std::fmt::Display) {
        let noun = if count == 1 { "entry" } else { "entries" };
        self.diagnostics.report(Diagnostic::new(
            DiagnosticLevel::Warn,
            Operation::Deliver,
            format!("dropped {} log {}: {}", count, noun, reason),
        ));
    }

    /// Write queued entries to the sink in FIFO order
    async fn drain_into(&self, sink: &mut OutputSink) {
        loop {
            // The queue lock must not be held across the await below
            let next = self.pending.lock().pop_front();
            let Some(lines) = next else {
                break;
            };
            sink.emit(&lines).await;
        }
    }

    async fn flush_pending(&self) {
        if let Err(e) = self.barrier.wait().await {
            // A concurrent call may already have discarded this entry
            let dropped = self.discard_pending().max(1);
            self.report_dropped(dropped, e);
            return;
        }

        let mut guard = self.sink.lock().await;
        match guard.as_mut() {
            Some(sink) => self.drain_into(sink).await,
            None => {
                let dropped = self.discard_pending();
                if dropped > 0 {
                    self.report_dropped(dropped, "logger was shut down");
                }
            }
        }
    }

    /// Write anything still queued, then tear the sink down
    async fn close(&self) {
        if let Err(e) = self.barrier.wait().await {
            let dropped = self.discard_pending();
            if dropped > 0 {
                self.report_dropped(dropped, e);
            }
            return;
        }

        let mut guard = self.sink.lock().await;
        if let Some(mut sink) = guard.take() {
            self.drain_into(&mut sink).await;
            sink.teardown().await;
        }
        let dropped = self.discard_pending();
        if dropped > 0 {
            self.report_dropped(dropped, "logger was shut down");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let dropped = self.pending.get_mut().len();
        if dropped > 0 {
            self.report_dropped(dropped, "logger dropped with no runtime left to write them");
        }
    }
}

/// Builder for [`Logger`] with custom collaborators
///
/// Anything not set uses the default: the platform documents directory,
/// stdout, a [`PrettyFormatter`] sized from the config, and stderr
/// diagnostics.
pub struct LoggerBuilder {
    config: LoggerConfig,
    documents: Option<Arc<dyn DocumentsResolver>>,
    console: Option<SharedConsole>,
    formatter: Option<SharedFormatter>,
    diagnostics: Option<SharedDiagnostics>,
}

impl LoggerBuilder {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            documents: None,
            console: None,
            formatter: None,
            diagnostics: None,
        }
    }

    /// Resolve the log directory through a custom resolver
    pub fn with_documents(mut self, resolver: impl DocumentsResolver + 'static) -> Self {
        self.documents = Some(Arc::new(resolver));
        self
    }

    /// Place the log file in a fixed directory
    pub fn with_documents_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.with_documents(FixedDirectory::new(dir))
    }

    pub fn with_console(mut self, console: SharedConsole) -> Self {
        self.console = Some(console);
        self
    }

    pub fn with_formatter(mut self, formatter: SharedFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: SharedDiagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Build the logger and start initialization
    ///
    /// Initialization is spawned on the current tokio runtime. Without a
    /// runtime the logger is still returned, but every call no-ops with a
    /// diagnostic.
    pub fn build(self) -> Logger {
        let formatter = self
            .formatter
            .unwrap_or_else(|| Arc::new(PrettyFormatter::new(self.config.error_stack_depth)));
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Arc::new(StderrDiagnostics::new()));
        let (signal, barrier) = init_barrier();

        let inner = Arc::new(Inner {
            config: self.config,
            documents: self.documents.unwrap_or_else(|| Arc::new(PlatformDocuments::new())),
            console: self.console.unwrap_or_else(|| Arc::new(StdoutConsole::new())),
            diagnostics,
            barrier,
            sink: tokio::sync::Mutex::new(None),
            pending: Mutex::new(VecDeque::new()),
        });

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let task_inner = inner.clone();
                handle.spawn(async move {
                    let outcome = task_inner.initialize().await;
                    if let Err(e) = &outcome {
                        task_inner.diagnostics.report(Diagnostic::from_error(
                            DiagnosticLevel::Error,
                            Operation::Initialize,
                            e,
                        ));
                    }
                    signal.complete(&outcome);
                });
                Some(handle)
            }
            Err(e) => {
                let err = LogError::Runtime(e.to_string());
                inner.diagnostics.report(Diagnostic::from_error(
                    DiagnosticLevel::Error,
                    Operation::Initialize,
                    &err,
                ));
                signal.fail(err.to_string());
                None
            }
        };

        Logger {
            inner,
            formatter,
            runtime,
        }
    }
}

/// Dual-sink logger writing to the console and/or an append-only file
pub struct Logger {
    inner: Arc<Inner>,
    formatter: SharedFormatter,
    /// Runtime the logger was built on; used for the final drain on drop
    runtime: Option<tokio::runtime::Handle>,
}

impl Logger {
    /// Create a logger with default collaborators
    pub fn new(config: LoggerConfig) -> Self {
        LoggerBuilder::new(config).build()
    }

    pub fn builder(config: LoggerConfig) -> LoggerBuilder {
        LoggerBuilder::new(config)
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    /// Whether initialization has finished (successfully or not)
    pub fn is_ready(&self) -> bool {
        self.inner.barrier.is_signaled()
    }

    /// Log a debug entry: `<timestamp> <message>`
    ///
    /// The entry is queued immediately; the returned future completes once it
    /// has been written. Never fails.
    pub fn debug(
        &self,
        message: impl Into<LogValue>,
        stack_trace: Option<StackTrace>,
    ) -> impl Future<Output = ()> + Send + '_ {
        let message: LogValue = message.into();
        let header = format!("{} {}", format_timestamp(&Local::now()), message);
        let lines = self.formatter.format(&header, None, stack_trace.as_ref());
        self.submit(lines)
    }

    /// Log an error entry: `<timestamp> [ERROR] <message>` plus the error text
    ///
    /// Without an explicit `stack_trace`, the trace at the call site is
    /// captured when the environment enables backtraces; otherwise no trace
    /// lines are printed.
    pub fn error(
        &self,
        err: impl Into<LogValue>,
        message: Option<LogValue>,
        stack_trace: Option<StackTrace>,
    ) -> impl Future<Output = ()> + Send + '_ {
        let timestamp = format_timestamp(&Local::now());
        let header = match message {
            Some(message) => format!("{} {} {}", timestamp, ERROR_TAG, message),
            None => format!("{} {}", timestamp, ERROR_TAG),
        };
        let error = Into::<LogValue>::into(err).render();
        let stack_trace = stack_trace.or_else(StackTrace::capture);
        let lines = self.formatter.format(&header, Some(&error), stack_trace.as_ref());
        self.submit(lines)
    }

    /// Log an error value directly, including its chain of causes
    pub fn error_from(
        &self,
        err: &(dyn std::error::Error + 'static),
        message: Option<LogValue>,
        stack_trace: Option<StackTrace>,
    ) -> impl Future<Output = ()> + Send + '_ {
        self.error(LogValue::from_error(err), message, stack_trace)
    }

    fn submit(&self, lines: Vec<String>) -> impl Future<Output = ()> + Send + '_ {
        self.inner.pending.lock().push_back(lines);
        self.inner.flush_pending()
    }

    /// Resolve the log file path from the current config
    ///
    /// This always asks the resolver again instead of reusing the path found
    /// during initialization.
    pub async fn log_file_path(&self) -> LogResult<PathBuf> {
        resolve_log_file_path(self.inner.documents.as_ref(), &self.inner.config.log_file_name).await
    }

    /// The log file, if one exists at the resolved path
    pub async fn get_log_file(&self) -> Option<PathBuf> {
        let path = match self.log_file_path().await {
            Ok(path) => path,
            Err(e) => {
                self.inner
                    .diagnostics
                    .report(Diagnostic::from_error(DiagnosticLevel::Warn, Operation::Locate, &e));
                return None;
            }
        };
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(path),
            _ => None,
        }
    }

    /// Empty the log file
    ///
    /// Entries queued before this call are written first. The file is then
    /// deleted and recreated, and the sink reopens its handle on the new
    /// file. If there is no file this does nothing.
    pub async fn clear_log_file(&self) -> LogResult<()> {
        let path = self.log_file_path().await?;
        // Outcome doesn't matter here; we only need the sink to be settled
        let _ = self.inner.barrier.wait().await;

        let mut guard = self.inner.sink.lock().await;
        if let Some(sink) = guard.as_mut() {
            self.inner.drain_into(sink).await;
        }

        if fs::metadata(&path).await.is_err() {
            return Ok(());
        }
        fs::remove_file(&path).await?;
        fs::File::create(&path).await?;

        if let Some(sink) = guard.as_mut() {
            sink.reopen().await?;
        }
        Ok(())
    }

    /// Write anything still queued and close the file
    ///
    /// Later calls log nothing. Calling this more than once is fine.
    pub async fn shutdown(&self) {
        self.inner.close().await;
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Entries of futures that were never awaited are still queued
        if let Some(handle) = &self.runtime {
            let inner = self.inner.clone();
            handle.spawn(async move {
                inner.close().await;
            });
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.inner.config)
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use crate::format::PlainFormatter;
    use crate::sink::MemoryConsole;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use tempfile::{tempdir, TempDir};

    struct Harness {
        dir: TempDir,
        console: Arc<MemoryConsole>,
        diagnostics: Arc<MemoryDiagnostics>,
        logger: Logger,
    }

    impl Harness {
        fn new(config: LoggerConfig) -> Self {
            let dir = tempdir().unwrap();
            Self::in_dir(dir, config)
        }

        fn in_dir(dir: TempDir, config: LoggerConfig) -> Self {
            let console = Arc::new(MemoryConsole::new());
            let diagnostics = Arc::new(MemoryDiagnostics::new());
            let logger = Logger::builder(config)
                .with_documents_dir(dir.path())
                .with_console(console.clone())
                .with_formatter(Arc::new(PlainFormatter::new(4)))
                .with_diagnostics(diagnostics.clone())
                .build();
            Self {
                dir,
                console,
                diagnostics,
                logger,
            }
        }

        fn file_contents(&self) -> String {
            let path = self.dir.path().join(&self.logger.config().log_file_name);
            std::fs::read_to_string(path).unwrap_or_default()
        }
    }

    /// Resolver that never finds a directory
    struct NoDocuments;

    #[async_trait]
    impl DocumentsResolver for NoDocuments {
        async fn documents_path(&self) -> LogResult<PathBuf> {
            Err(LogError::documents_unavailable("sandboxed"))
        }
    }

    /// Resolver that waits before answering
    struct SlowDocuments(PathBuf);

    #[async_trait]
    impl DocumentsResolver for SlowDocuments {
        async fn documents_path(&self) -> LogResult<PathBuf> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_timestamp_is_zero_padded() {
        let at = Local.with_ymd_and_hms(2024, 3, 7, 4, 5, 9).unwrap();
        assert_eq!(format_timestamp(&at), "07-03 04:05:09");
    }

    #[tokio::test]
    async fn test_debug_line_has_timestamp_prefix() {
        let h = Harness::new(LoggerConfig::default());
        h.logger.debug("hello", None).await;

        let contents = h.file_contents();
        let line = contents.lines().next().unwrap();
        assert!(line.ends_with(" hello"));
        let stamp = &line[..14];
        assert_eq!(stamp.len(), 14);
        assert_eq!(&stamp[2..3], "-");
        assert_eq!(&stamp[5..6], " ");
        assert_eq!(&stamp[8..9], ":");
        assert_eq!(&stamp[11..12], ":");
    }

    #[tokio::test]
    async fn test_sequential_calls_keep_order() {
        let h = Harness::new(LoggerConfig::default());
        for i in 0..20 {
            h.logger.debug(format!("message {}", i), None).await;
        }

        let contents = h.file_contents();
        let positions: Vec<usize> = (0..20)
            .map(|i| contents.find(&format!("message {}\n", i)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_concurrent_calls_keep_call_order() {
        let h = Harness::new(LoggerConfig::default());
        let futures: Vec<_> = (0..10).map(|i| h.logger.debug(format!("entry {}", i), None)).collect();
        // Await in reverse; the file must still follow call order
        for fut in futures.into_iter().rev() {
            fut.await;
        }

        let contents = h.file_contents();
        let positions: Vec<usize> = (0..10)
            .map(|i| contents.find(&format!("entry {}\n", i)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_joined_calls_do_not_interleave() {
        let h = Harness::new(LoggerConfig::default());
        let calls = (0..5).map(|i| {
            h.logger
                .error(format!("err {}", i), None, Some(StackTrace::from_lines(["frame"])))
        });
        futures::future::join_all(calls).await;

        // Each entry is three lines (header, error, frame) and stays contiguous
        let lines: Vec<String> = h.file_contents().lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 15);
        for (i, chunk) in lines.chunks(3).enumerate() {
            assert!(chunk[0].ends_with("[ERROR]"));
            assert_eq!(chunk[1], format!("err {}", i));
            assert_eq!(chunk[2], "#0   frame");
        }
    }

    #[tokio::test]
    async fn test_mapping_and_sequence_rendering() {
        let h = Harness::new(LoggerConfig::default());
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        h.logger.debug(map, None).await;
        h.logger.debug(vec![1, 2, 3, 4], None).await;

        let contents = h.file_contents();
        assert!(contents.contains("{a: 1}"));
        assert!(contents.contains("[1, 2, 3, 4]"));
    }

    #[tokio::test]
    async fn test_error_with_message() {
        let h = Harness::new(LoggerConfig::default());
        h.logger
            .error("connection refused", Some("M".into()), Some(StackTrace::default()))
            .await;

        let contents = h.file_contents();
        let header = contents.lines().next().unwrap();
        assert!(header.contains("[ERROR]"));
        assert!(header.ends_with("[ERROR] M"));
        assert!(contents.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_error_without_message_still_tagged() {
        let h = Harness::new(LoggerConfig::default());
        h.logger.error("boom", None, None).await;

        let contents = h.file_contents();
        assert!(contents.lines().next().unwrap().ends_with("[ERROR]"));
        assert!(contents.contains("boom"));
    }

    #[tokio::test]
    async fn test_error_prints_supplied_trace_up_to_depth() {
        let h = Harness::new(LoggerConfig::default());
        let trace = StackTrace::from_lines(["f0", "f1", "f2", "f3", "f4", "f5"]);
        h.logger.error("bad", None, Some(trace)).await;

        let contents = h.file_contents();
        assert!(contents.contains("#3   f3"));
        assert!(!contents.contains("f4"));
    }

    #[tokio::test]
    async fn test_clear_log_file_removes_earlier_content() {
        let h = Harness::new(LoggerConfig::default());
        h.logger.debug("before clear", None).await;
        assert!(h.file_contents().contains("before clear"));

        h.logger.clear_log_file().await.unwrap();
        assert_eq!(h.file_contents(), "");

        h.logger.debug("after clear", None).await;
        let contents = h.file_contents();
        assert!(!contents.contains("before clear"));
        assert!(contents.contains("after clear"));
    }

    #[tokio::test]
    async fn test_clear_writes_entries_queued_before_it_first() {
        let h = Harness::new(LoggerConfig::default());
        let queued = h.logger.debug("queued", None);
        h.logger.clear_log_file().await.unwrap();
        queued.await;
        h.logger.debug("fresh", None).await;

        let contents = h.file_contents();
        assert!(!contents.contains("queued"));
        assert!(contents.contains("fresh"));
    }

    #[tokio::test]
    async fn test_clear_without_file_is_noop() {
        let h = Harness::new(LoggerConfig::default());
        h.logger.clear_log_file().await.unwrap();
        assert!(h.logger.get_log_file().await.is_none());
    }

    #[tokio::test]
    async fn test_get_log_file_absent_until_written() {
        let h = Harness::new(LoggerConfig::default());
        assert!(h.logger.get_log_file().await.is_none());

        h.logger.debug("now it exists", None).await;
        let path = h.logger.get_log_file().await.unwrap();
        assert_eq!(path, h.dir.path().join("elog.txt"));
    }

    #[tokio::test]
    async fn test_file_disabled_writes_console_only() {
        let h = Harness::new(LoggerConfig::default().with_write_to_file(false));
        h.logger.debug("console only", None).await;
        h.logger.error("oops", None, Some(StackTrace::default())).await;

        assert!(h.logger.get_log_file().await.is_none());
        assert!(!h.dir.path().join("elog.txt").exists());
        assert!(h.console.contents().contains("console only"));
        assert!(h.console.contents().contains("oops"));
    }

    #[tokio::test]
    async fn test_console_disabled_writes_file_only() {
        let h = Harness::new(LoggerConfig::default().with_write_to_console(false));
        h.logger.debug("file only", None).await;

        assert!(h.console.is_empty());
        assert!(h.file_contents().contains("file only"));
    }

    #[tokio::test]
    async fn test_loggers_with_different_files_do_not_cross_write() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let a = Logger::builder(LoggerConfig::default().with_log_file_name("a.txt").with_write_to_console(false))
            .with_documents_dir(&root)
            .build();
        let b = Logger::builder(LoggerConfig::default().with_log_file_name("b.txt").with_write_to_console(false))
            .with_documents_dir(&root)
            .build();

        a.debug("from a", None).await;
        b.debug("from b", None).await;

        let a_text = std::fs::read_to_string(root.join("a.txt")).unwrap();
        let b_text = std::fs::read_to_string(root.join("b.txt")).unwrap();
        assert!(a_text.contains("from a") && !a_text.contains("from b"));
        assert!(b_text.contains("from b") && !b_text.contains("from a"));
    }

    #[tokio::test]
    async fn test_calls_before_initialization_are_written_in_order() {
        let dir = tempdir().unwrap();
        let console = Arc::new(MemoryConsole::new());
        let logger = Logger::builder(LoggerConfig::default())
            .with_documents(SlowDocuments(dir.path().to_path_buf()))
            .with_console(console.clone())
            .with_formatter(Arc::new(PlainFormatter::default()))
            .build();
        assert!(!logger.is_ready());

        let first = logger.debug("first", None);
        let second = logger.debug("second", None);
        second.await;
        first.await;
        assert!(logger.is_ready());

        let lines = console.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
    }

    #[tokio::test]
    async fn test_initialization_failure_degrades_to_diagnostics() {
        let console = Arc::new(MemoryConsole::new());
        let diagnostics = Arc::new(MemoryDiagnostics::new());
        let logger = Logger::builder(LoggerConfig::default())
            .with_documents(NoDocuments)
            .with_console(console.clone())
            .with_diagnostics(diagnostics.clone())
            .build();

        logger.debug("lost", None).await;
        logger.error("also lost", None, None).await;

        assert!(logger.is_ready());
        assert!(console.is_empty());
        let messages = diagnostics.messages_at_least(DiagnosticLevel::Warn);
        assert!(messages.iter().any(|m| m.contains("sandboxed")));
        assert!(messages.iter().filter(|m| m.contains("dropped")).count() >= 2);
        assert!(logger.get_log_file().await.is_none());
        assert!(matches!(
            logger.clear_log_file().await,
            Err(LogError::DocumentsUnavailable(_))
        ));
    }

    #[test]
    fn test_construction_without_runtime_does_not_panic() {
        let diagnostics = Arc::new(MemoryDiagnostics::new());
        let logger = Logger::builder(LoggerConfig::default())
            .with_documents_dir("/nonexistent")
            .with_diagnostics(diagnostics.clone())
            .build();

        assert!(logger.is_ready());
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(logger.debug("nowhere to go", None));
        assert!(diagnostics
            .messages_at_least(DiagnosticLevel::Error)
            .iter()
            .any(|m| m.contains("runtime")));
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent_and_stops_logging() {
        let h = Harness::new(LoggerConfig::default());
        h.logger.debug("kept", None).await;
        h.logger.shutdown().await;
        h.logger.shutdown().await;

        h.logger.debug("ignored", None).await;
        let contents = h.file_contents();
        assert!(contents.contains("kept"));
        assert!(!contents.contains("ignored"));
        assert!(h
            .diagnostics
            .messages_at_least(DiagnosticLevel::Warn)
            .iter()
            .any(|m| m.contains("shut down")));
    }

    #[tokio::test]
    async fn test_existing_file_is_appended() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("elog.txt"), "from last run\n").unwrap();
        let h = Harness::in_dir(dir, LoggerConfig::default());
        h.logger.debug("this run", None).await;

        let contents = h.file_contents();
        assert!(contents.starts_with("from last run\n"));
        assert!(contents.contains("this run"));
    }

    #[tokio::test]
    async fn test_default_formatter_is_pretty() {
        let dir = tempdir().unwrap();
        let console = Arc::new(MemoryConsole::new());
        let logger = Logger::builder(LoggerConfig::default().with_write_to_file(false))
            .with_documents_dir(dir.path())
            .with_console(console.clone())
            .build();
        logger.debug("boxed", None).await;

        let lines = console.lines();
        assert!(lines.first().unwrap().starts_with('┌'));
        assert!(lines.last().unwrap().starts_with('└'));
        assert!(lines.iter().any(|l| l.ends_with(" boxed")));
    }

    #[tokio::test]
    async fn test_error_from_includes_cause_chain() {
        let h = Harness::new(LoggerConfig::default());
        let err = LogError::open(
            "settings.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        h.logger
            .error_from(&err, Some("saving settings".into()), None)
            .await;

        let contents = h.file_contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].ends_with("[ERROR] saving settings"));
        assert_eq!(
            lines[1],
            "Failed to open log file settings.json: denied (caused by: denied)"
        );
    }

    #[tokio::test]
    async fn test_dropping_logger_writes_unawaited_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("elog.txt");
        let diagnostics = Arc::new(MemoryDiagnostics::new());
        let logger = Logger::builder(LoggerConfig::default())
            .with_documents_dir(dir.path())
            .with_console(Arc::new(MemoryConsole::new()))
            .with_formatter(Arc::new(PlainFormatter::default()))
            .with_diagnostics(diagnostics.clone())
            .build();

        logger.debug("awaited", None).await;
        drop(logger.debug("fire and forget", None));
        drop(logger);
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("awaited"));
        assert!(lines[1].ends_with("fire and forget"));
        assert!(diagnostics.messages_at_least(DiagnosticLevel::Warn).is_empty());
    }

    #[tokio::test]
    async fn test_unawaited_entry_is_written_by_next_call() {
        let h = Harness::new(LoggerConfig::default());
        drop(h.logger.debug("skipped await", None));
        h.logger.debug("awaited", None).await;

        let contents = h.file_contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("skipped await"));
        assert!(lines[1].ends_with("awaited"));
    }

    #[test]
    fn test_entries_that_cannot_be_written_are_reported_on_drop() {
        let diagnostics = Arc::new(MemoryDiagnostics::new());
        let logger = Logger::builder(LoggerConfig::default())
            .with_documents_dir("/nonexistent")
            .with_console(Arc::new(MemoryConsole::new()))
            .with_diagnostics(diagnostics.clone())
            .build();

        drop(logger.debug("never written", None));
        drop(logger);

        let undelivered = diagnostics.for_operation(Operation::Deliver);
        assert_eq!(undelivered.len(), 1);
        assert_eq!(undelivered[0].level, DiagnosticLevel::Warn);
        assert!(undelivered[0].message.starts_with("dropped 1 log entry"));
    }
}
