// crates/mirror-acceptance-core/src/results.rs
// ============================================================================
// Module: Acceptance Results
// Description: Per-check, per-suite and whole-run result records.
// Purpose: Aggregate check outcomes with counts derived from the results.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TestResult`] captures one check. A [`SuiteResult`] is only built from
//! a finished list of results, so its counts and success flag always agree
//! with the list. An [`AcceptanceReport`] groups suites for a full run.
//! Invariants:
//! - `num_passed_tests + num_failed_tests == test_results.len()`.
//! - `success == (num_failed_tests == 0)`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Suite Kinds
// ============================================================================

/// Acceptance suite identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteKind {
    /// Account listing and lookup checks.
    Accounts,
    /// Balance listing and lookup checks.
    Balances,
}

impl SuiteKind {
    /// Every suite in report order.
    pub const ALL: [Self; 2] = [Self::Accounts, Self::Balances];

    /// Returns the stable suite label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Balances => "balances",
        }
    }
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Test Results
// ============================================================================

/// Outcome status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// All assertions held.
    Passed,
    /// An assertion or request failed.
    Failed,
}

/// Outcome of one acceptance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Check name.
    pub check: String,
    /// Start time in unix milliseconds.
    pub at: u64,
    /// Pass or fail.
    pub result: TestStatus,
    /// Last URL requested by the check.
    pub url: String,
    /// Human-readable summary.
    pub message: String,
    /// Failure details, empty on success.
    pub failure_messages: Vec<String>,
}

impl TestResult {
    /// Builds a passing result.
    #[must_use]
    pub fn passed(check: &str, at: u64, url: String, message: &str) -> Self {
        Self {
            check: check.to_string(),
            at,
            result: TestStatus::Passed,
            url,
            message: message.to_string(),
            failure_messages: Vec::new(),
        }
    }

    /// Builds a failing result from its failure details.
    #[must_use]
    pub fn failed(check: &str, at: u64, url: String, failure_messages: Vec<String>) -> Self {
        Self {
            check: check.to_string(),
            at,
            result: TestStatus::Failed,
            url,
            message: format!("{check} failed"),
            failure_messages,
        }
    }

    /// Returns true when the check passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.result == TestStatus::Passed
    }
}

// ============================================================================
// SECTION: Suite Results
// ============================================================================

/// Aggregate outcome of one suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteResult {
    /// Suite that produced the results.
    suite: SuiteKind,
    /// Suite start time in unix milliseconds.
    start_time: u64,
    /// Check results in a fixed order.
    test_results: Vec<TestResult>,
    /// Count of passed checks.
    num_passed_tests: usize,
    /// Count of failed checks.
    num_failed_tests: usize,
    /// True when no check failed.
    success: bool,
    /// Summary line.
    message: String,
}

impl SuiteResult {
    /// Builds a suite result, deriving counts from `test_results`.
    #[must_use]
    pub fn from_results(suite: SuiteKind, start_time: u64, test_results: Vec<TestResult>) -> Self {
        let num_passed_tests = test_results.iter().filter(|result| result.is_passed()).count();
        let num_failed_tests = test_results.len() - num_passed_tests;
        let message =
            format!("{num_passed_tests} of {} {suite} checks passed", test_results.len());
        Self {
            suite,
            start_time,
            test_results,
            num_passed_tests,
            num_failed_tests,
            success: num_failed_tests == 0,
            message,
        }
    }

    /// Returns the suite kind.
    #[must_use]
    pub const fn suite(&self) -> SuiteKind {
        self.suite
    }

    /// Returns the suite start time.
    #[must_use]
    pub const fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Returns the check results in order.
    #[must_use]
    pub fn test_results(&self) -> &[TestResult] {
        &self.test_results
    }

    /// Returns the passed check count.
    #[must_use]
    pub const fn num_passed_tests(&self) -> usize {
        self.num_passed_tests
    }

    /// Returns the failed check count.
    #[must_use]
    pub const fn num_failed_tests(&self) -> usize {
        self.num_failed_tests
    }

    /// Returns true when no check failed.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Returns the summary line.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// SECTION: Acceptance Report
// ============================================================================

/// Outcome of a full acceptance run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptanceReport {
    /// Run start time in unix milliseconds.
    start_time: u64,
    /// Suite results in report order.
    suites: Vec<SuiteResult>,
    /// True when every suite succeeded.
    success: bool,
}

impl AcceptanceReport {
    /// Builds a report; success requires every suite to succeed.
    #[must_use]
    pub fn from_suites(start_time: u64, suites: Vec<SuiteResult>) -> Self {
        let success = suites.iter().all(SuiteResult::success);
        Self {
            start_time,
            suites,
            success,
        }
    }

    /// Returns the run start time.
    #[must_use]
    pub const fn start_time(&self) -> u64 {
        self.start_time
    }

    /// Returns the suite results.
    #[must_use]
    pub fn suites(&self) -> &[SuiteResult] {
        &self.suites
    }

    /// Returns true when every suite succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }
}

// ============================================================================
// SECTION: Time
// ============================================================================

/// Returns the current unix time in milliseconds.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
