// crates/mirror-acceptance-core/src/events.rs
// ============================================================================
// Module: Acceptance Event Logging
// Description: Structured JSON-line events emitted while suites run.
// Purpose: Route check and fetch outcomes to a configurable sink.
// Dependencies: mirror-acceptance-config, serde, serde_json
// ============================================================================

//! ## Overview
//! Suites report progress as [`AcceptanceEvent`] payloads written as JSON
//! lines. Stdout carries the final report, so sinks write to stderr or to an
//! append-only file. Sink write failures are dropped and never fail a check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use mirror_acceptance_config::LogConfig;
use mirror_acceptance_config::LogSinkKind;
use serde::Serialize;

use crate::results::SuiteKind;
use crate::results::SuiteResult;
use crate::results::TestResult;
use crate::results::TestStatus;
use crate::results::now_millis;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event label for a finished check.
pub const EVENT_CHECK_COMPLETED: &str = "check_completed";
/// Event label for a failed HTTP request.
pub const EVENT_FETCH_FAILED: &str = "fetch_failed";
/// Event label for a finished suite.
pub const EVENT_SUITE_COMPLETED: &str = "suite_completed";

/// Acceptance event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptanceEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u64,
    /// Suite that emitted the event.
    pub suite: SuiteKind,
    /// Check name, absent for suite-level events.
    pub check: Option<String>,
    /// URL involved, when any.
    pub url: Option<String>,
    /// Outcome classification.
    pub outcome: TestStatus,
    /// Free-form detail line.
    pub detail: Option<String>,
}

impl AcceptanceEvent {
    /// Builds a `check_completed` event from a finished check.
    #[must_use]
    pub fn check_completed(suite: SuiteKind, result: &TestResult) -> Self {
        Self {
            event: EVENT_CHECK_COMPLETED,
            timestamp_ms: now_millis(),
            suite,
            check: Some(result.check.clone()),
            url: Some(result.url.clone()),
            outcome: result.result,
            detail: result.failure_messages.first().cloned(),
        }
    }

    /// Builds a `fetch_failed` event for a request error.
    #[must_use]
    pub fn fetch_failed(suite: SuiteKind, check: &str, url: &str, detail: String) -> Self {
        Self {
            event: EVENT_FETCH_FAILED,
            timestamp_ms: now_millis(),
            suite,
            check: Some(check.to_string()),
            url: Some(url.to_string()),
            outcome: TestStatus::Failed,
            detail: Some(detail),
        }
    }

    /// Builds a `suite_completed` event from a suite summary.
    #[must_use]
    pub fn suite_completed(result: &SuiteResult) -> Self {
        Self {
            event: EVENT_SUITE_COMPLETED,
            timestamp_ms: now_millis(),
            suite: result.suite(),
            check: None,
            url: None,
            outcome: if result.success() { TestStatus::Passed } else { TestStatus::Failed },
            detail: Some(result.message().to_string()),
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for acceptance events.
pub trait EventSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: &AcceptanceEvent);
}

/// Sink that writes JSON lines to stderr.
pub struct StderrEventSink;

impl EventSink for StderrEventSink {
    fn record(&self, event: &AcceptanceEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log in append mode, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventSink for FileEventSink {
    fn record(&self, event: &AcceptanceEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that discards events.
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event: &AcceptanceEvent) {}
}

/// Builds the sink selected by the `[log]` config section.
///
/// # Errors
///
/// Returns an error when the file sink cannot open its path.
pub fn sink_from_config(config: &LogConfig) -> io::Result<Box<dyn EventSink>> {
    match (config.sink, &config.path) {
        (LogSinkKind::Stderr, _) => Ok(Box::new(StderrEventSink)),
        (LogSinkKind::File, Some(path)) => Ok(Box::new(FileEventSink::new(path)?)),
        (LogSinkKind::File, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "log.sink=file requires log.path",
        )),
        (LogSinkKind::Disabled, _) => Ok(Box::new(NoopEventSink)),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
