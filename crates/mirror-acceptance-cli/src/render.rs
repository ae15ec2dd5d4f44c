// crates/mirror-acceptance-cli/src/render.rs
// ============================================================================
// Module: Report Rendering
// Description: Text and JSON renderings of an acceptance report.
// Purpose: Produce the stdout payload and the optional report file.
// Dependencies: mirror-acceptance-core, serde_json
// ============================================================================

//! ## Overview
//! Text output is a compact per-check listing meant for terminals and CI logs.
//! JSON output is the serialized [`AcceptanceReport`] and is the stable,
//! machine-readable form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use mirror_acceptance_core::AcceptanceReport;
use mirror_acceptance_core::SuiteResult;
use mirror_acceptance_core::TestResult;

// ============================================================================
// SECTION: Text
// ============================================================================

/// Renders the report as human-readable text.
#[must_use]
pub fn render_text(report: &AcceptanceReport) -> String {
    let mut lines = Vec::new();
    for suite in report.suites() {
        push_suite(&mut lines, suite);
    }
    let overall = if report.success() { "PASS" } else { "FAIL" };
    lines.push(format!("overall: {overall}"));
    lines.join("\n")
}

/// Appends the header and check lines for one suite.
fn push_suite(lines: &mut Vec<String>, suite: &SuiteResult) {
    lines.push(format!("{}: {}", suite.suite(), suite.message()));
    for result in suite.test_results() {
        push_check(lines, result);
    }
}

/// Appends one check line plus failure detail.
fn push_check(lines: &mut Vec<String>, result: &TestResult) {
    if result.is_passed() {
        lines.push(format!("  PASS {}: {}", result.check, result.message));
        return;
    }
    lines.push(format!("  FAIL {}: {}", result.check, result.message));
    for failure in &result.failure_messages {
        lines.push(format!("       - {failure}"));
    }
    if !result.url.is_empty() {
        lines.push(format!("       url: {}", result.url));
    }
}

// ============================================================================
// SECTION: JSON
// ============================================================================

/// Renders the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn render_json(report: &AcceptanceReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
