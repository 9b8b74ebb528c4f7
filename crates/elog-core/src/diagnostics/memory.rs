//! In-memory diagnostics

use parking_lot::Mutex;

use super::traits::{Diagnostic, DiagnosticLevel, Diagnostics, Operation};

/// Diagnostics sink that keeps every event in memory
///
/// Used by tests to assert that failures were reported, and by hosts that
/// want to surface logger problems in their own UI.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// Rendered events at `level` or above
    pub fn messages_at_least(&self, level: DiagnosticLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level >= level)
            .map(|r| r.to_string())
            .collect()
    }

    /// Events reported while performing `operation`
    pub fn for_operation(&self, operation: Operation) -> Vec<Diagnostic> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.operation == operation)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.records.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let diag = MemoryDiagnostics::new();
        assert!(diag.is_empty());

        diag.report(Diagnostic::new(DiagnosticLevel::Debug, Operation::Open, "opened"));
        diag.report(Diagnostic::new(DiagnosticLevel::Warn, Operation::Deliver, "dropped 2 log entries"));
        diag.report(Diagnostic::new(DiagnosticLevel::Error, Operation::Write, "disk full"));

        let records = diag.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].level, DiagnosticLevel::Error);
        assert_eq!(
            diag.messages_at_least(DiagnosticLevel::Warn),
            vec!["deliver: dropped 2 log entries", "write: disk full"]
        );
        assert_eq!(diag.for_operation(Operation::Open).len(), 1);

        diag.clear();
        assert!(diag.is_empty());
    }
}
