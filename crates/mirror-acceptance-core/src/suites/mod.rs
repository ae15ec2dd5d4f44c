// crates/mirror-acceptance-core/src/suites/mod.rs
// ============================================================================
// Module: Acceptance Suites
// Description: Shared check plumbing for the account and balance suites.
// Purpose: Turn request and assertion outcomes into immutable test results.
// Dependencies: mirror-acceptance-config, serde_json
// ============================================================================

//! ## Overview
//! Each check runs inside a [`CheckScope`] that remembers the last URL it
//! requested and reports request failures as `fetch_failed` events. A check
//! body returns either its success message or the first [`CheckFailure`] it
//! hit; the scope then builds the [`TestResult`] and emits `check_completed`.
//! Invariants:
//! - A failed check carries exactly one assertion message, optionally
//!   followed by detail lines.
//! - No request or record error escapes a check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use mirror_acceptance_config::ApiConfig;
use serde_json::Value;

use crate::client::FetchError;
use crate::client::MirrorClient;
use crate::client::list_field;
use crate::events::AcceptanceEvent;
use crate::events::EventSink;
use crate::identifiers::EntityId;
use crate::records::RecordError;
use crate::records::highest_entity_ordinal;
use crate::records::record_entity_id;
use crate::results::SuiteKind;
use crate::results::TestResult;
use crate::results::now_millis;

pub mod accounts;
pub mod balances;

pub use accounts::AccountAcceptanceSuite;
pub use balances::BalanceAcceptanceSuite;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Failure message when the highest identifier does not round-trip.
pub const HIGHEST_NOT_FOUND: &str = "Highest acc check was not found";

// ============================================================================
// SECTION: Suite Context
// ============================================================================

/// Borrowed dependencies shared by the checks of one suite run.
#[derive(Clone, Copy)]
pub(crate) struct SuiteContext<'a> {
    /// Suite the checks belong to.
    pub(crate) kind: SuiteKind,
    /// REST client.
    pub(crate) client: &'a MirrorClient,
    /// API target settings.
    pub(crate) api: &'a ApiConfig,
    /// Event destination.
    pub(crate) sink: &'a dyn EventSink,
}

// ============================================================================
// SECTION: Check Failures
// ============================================================================

/// First failed assertion of a check, with optional detail lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckFailure {
    /// Assertion message.
    message: String,
    /// Supporting detail lines.
    details: Vec<String>,
}

impl CheckFailure {
    /// Builds a failure from an assertion message.
    pub(crate) fn assertion(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Appends detail lines.
    pub(crate) fn with_details(mut self, details: impl IntoIterator<Item = String>) -> Self {
        self.details.extend(details);
        self
    }

    /// Flattens the failure into result failure messages.
    fn into_messages(self) -> Vec<String> {
        let mut messages = Vec::with_capacity(1 + self.details.len());
        messages.push(self.message);
        messages.extend(self.details);
        messages
    }
}

impl From<FetchError> for CheckFailure {
    fn from(err: FetchError) -> Self {
        Self::assertion(err.to_string())
    }
}

impl From<RecordError> for CheckFailure {
    fn from(err: RecordError) -> Self {
        Self::assertion(err.to_string())
    }
}

/// Outcome of a check body: its success message or the first failure.
pub(crate) type CheckOutcome = Result<&'static str, CheckFailure>;

// ============================================================================
// SECTION: Check Scope
// ============================================================================

/// Per-check state: name, start time and the last requested URL.
pub(crate) struct CheckScope<'a> {
    /// Shared suite dependencies.
    ctx: SuiteContext<'a>,
    /// Check name.
    check: &'static str,
    /// Check start time in unix milliseconds.
    at: u64,
    /// Last URL requested.
    url: String,
}

impl<'a> CheckScope<'a> {
    /// Opens a scope for the named check.
    pub(crate) fn new(ctx: SuiteContext<'a>, check: &'static str) -> Self {
        Self {
            ctx,
            check,
            at: now_millis(),
            url: String::new(),
        }
    }

    /// Returns the API target settings.
    pub(crate) const fn api(&self) -> &'a ApiConfig {
        self.ctx.api
    }

    /// Requests `path_and_query` and decodes the JSON body.
    pub(crate) async fn get(&mut self, path_and_query: &str) -> Result<Value, CheckFailure> {
        self.url = self.ctx.client.url(path_and_query);
        match self.ctx.client.get_json(&self.url).await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.ctx.sink.record(&AcceptanceEvent::fetch_failed(
                    self.ctx.kind,
                    self.check,
                    &self.url,
                    err.to_string(),
                ));
                Err(err.into())
            }
        }
    }

    /// Requests a list endpoint and returns the array under `field`.
    pub(crate) async fn get_list(
        &mut self,
        path_and_query: &str,
        field: &str,
    ) -> Result<Vec<Value>, CheckFailure> {
        let envelope = self.get(path_and_query).await?;
        Ok(list_field(envelope, field)?)
    }

    /// Closes the scope, producing the result and its `check_completed` event.
    pub(crate) fn finish(self, outcome: CheckOutcome) -> TestResult {
        let result = match outcome {
            Ok(message) => TestResult::passed(self.check, self.at, self.url, message),
            Err(failure) => {
                TestResult::failed(self.check, self.at, self.url, failure.into_messages())
            }
        };
        self.ctx.sink.record(&AcceptanceEvent::check_completed(self.ctx.kind, &result));
        result
    }
}

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Requires a full page of `limit` records.
pub(crate) fn expect_page_len(
    records: &[Value],
    resource: &str,
    limit: usize,
) -> Result<(), CheckFailure> {
    if records.len() == limit {
        return Ok(());
    }
    Err(CheckFailure::assertion(format!(
        "{resource}.length of {} is less than limit {limit}",
        records.len()
    )))
}

/// Requires exactly one record and returns it.
pub(crate) fn expect_single<'r>(
    records: &'r [Value],
    label: &str,
) -> Result<&'r Value, CheckFailure> {
    match records {
        [only] => Ok(only),
        _ => Err(CheckFailure::assertion(format!(
            "{label}.length of {} was expected to be 1",
            records.len()
        ))),
    }
}

/// Fails with `message` when any mandatory field is missing.
pub(crate) fn require_fields(missing: Vec<String>, message: &str) -> Result<(), CheckFailure> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(CheckFailure::assertion(message)
        .with_details(missing.into_iter().map(|field| format!("missing field: {field}"))))
}

/// Returns the highest identifier among `records`.
pub(crate) fn highest_identifier(records: &[Value]) -> Result<EntityId, CheckFailure> {
    let ordinal =
        highest_entity_ordinal(records)?.ok_or_else(|| CheckFailure::assertion(HIGHEST_NOT_FOUND))?;
    EntityId::from_ordinal(ordinal).map_err(|err| CheckFailure::assertion(err.to_string()))
}

/// Requires `record` to carry the `expected` identifier.
pub(crate) fn expect_identifier(
    record: Option<&Value>,
    expected: EntityId,
) -> Result<(), CheckFailure> {
    let found = match record.map(record_entity_id) {
        Some(Ok(found)) if found == expected => return Ok(()),
        Some(Ok(found)) => found.to_string(),
        Some(Err(err)) => err.to_string(),
        None => "no record".to_string(),
    };
    Err(CheckFailure::assertion(HIGHEST_NOT_FOUND)
        .with_details([format!("expected {expected}, found {found}")]))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
