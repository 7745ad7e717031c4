//! Diagnostic reporting to the host.
//!
//! Configuration and execution failures are reported through a
//! [`DiagnosticSink`] in addition to being returned, so an embedding host
//! can surface them in its own log.

use parking_lot::Mutex;
use std::fmt;

/// Severity of a reported diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Receiver for diagnostics produced by a table
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, severity: Severity, message: &str);
}

/// Sink that forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => log::debug!("{}", message),
            Severity::Info => log::info!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
    }
}

/// Sink that keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().clone()
    }

    /// Number of diagnostics at or above `severity`
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|(s, _)| *s >= severity)
            .count()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, severity: Severity, message: &str) {
        self.entries.lock().push((severity, message.to_string()));
    }
}
