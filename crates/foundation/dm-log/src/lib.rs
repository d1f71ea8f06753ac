//! Advisory log collection
//!
//! Loaders report progress and per-file failures through a [`LogCollector`].
//! Reports are a side channel only: a collector never changes what a loader
//! returns.

use std::sync::Mutex;

/// Sink for status and error reports
pub trait LogCollector: Send + Sync {
    /// Reports a progress message
    fn report_status(&self, message: &str);

    /// Reports a recoverable failure
    fn report_error(&self, message: &str);
}

/// Collector that drops every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogCollector;

impl LogCollector for NullLogCollector {
    fn report_status(&self, _message: &str) {}

    fn report_error(&self, _message: &str) {}
}

/// Collector that forwards reports to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogCollector;

impl LogCollector for TracingLogCollector {
    fn report_status(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn report_error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// A single recorded report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// Reported through [`LogCollector::report_status`]
    Status(String),
    /// Reported through [`LogCollector::report_error`]
    Error(String),
}

/// Collector that keeps every report in memory
#[derive(Debug, Default)]
pub struct RecordingLogCollector {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogCollector {
    /// Creates an empty collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every report in the order it was made
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Returns the reported status messages
    pub fn statuses(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                LogEntry::Status(message) => Some(message),
                LogEntry::Error(_) => None,
            })
            .collect()
    }

    /// Returns the reported error messages
    pub fn errors(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                LogEntry::Error(message) => Some(message),
                LogEntry::Status(_) => None,
            })
            .collect()
    }

    fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

impl LogCollector for RecordingLogCollector {
    fn report_status(&self, message: &str) {
        self.push(LogEntry::Status(message.to_string()));
    }

    fn report_error(&self, message: &str) {
        self.push(LogEntry::Error(message.to_string()));
    }
}
