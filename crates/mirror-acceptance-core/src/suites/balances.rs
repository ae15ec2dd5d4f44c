// crates/mirror-acceptance-core/src/suites/balances.rs
// ============================================================================
// Module: Balance Acceptance Suite
// Description: Checks against the balance listing and lookup endpoints.
// Dependencies: mirror-acceptance-config, tokio
// ============================================================================

//! ## Overview
//! Three independent checks run concurrently against `/balances`. The
//! time window is taken from the list envelope `timestamp`, and single
//! lookups go through the `account.id` query parameter rather than a path.

use mirror_acceptance_config::ApiConfig;
use serde_json::Value;

use super::CheckFailure;
use super::CheckOutcome;
use super::CheckScope;
use super::SuiteContext;
use super::expect_identifier;
use super::expect_page_len;
use super::expect_single;
use super::highest_identifier;
use super::require_fields;
use crate::client::MirrorClient;
use crate::client::envelope_timestamp;
use crate::client::list_field;
use crate::events::AcceptanceEvent;
use crate::events::EventSink;
use crate::events::NoopEventSink;
use crate::identifiers::EntityId;
use crate::records::ConsensusTimestamp;
use crate::records::missing_balance_fields;
use crate::results::SuiteKind;
use crate::results::SuiteResult;
use crate::results::TestResult;
use crate::results::now_millis;

/// Balance list path.
const BALANCES_PATH: &str = "/balances";
/// List envelope field.
const BALANCES_FIELD: &str = "balances";
/// Page size used by the single lookup check.
const SINGLE_LOOKUP_PAGE: usize = 10;
/// Mandatory field failure message.
const MISSING_FIELDS: &str = "balance object is missing some mandatory fields";
/// Success message for the identifier round-trip checks.
const ACCOUNT_CHECK_PASSED: &str = "Successfully called balances and performed account check";
/// Success message for the time window check.
const TIME_AND_LIMIT_PASSED: &str = "Successfully called balances with time and limit params";

/// Acceptance suite for the balance endpoints.
pub struct BalanceAcceptanceSuite<'a> {
    /// REST client.
    client: &'a MirrorClient,
    /// API target settings.
    api: &'a ApiConfig,
    /// Event destination.
    sink: &'a dyn EventSink,
}

impl<'a> BalanceAcceptanceSuite<'a> {
    /// Builds the suite with events discarded.
    #[must_use]
    pub fn new(client: &'a MirrorClient, api: &'a ApiConfig) -> Self {
        Self {
            client,
            api,
            sink: &NoopEventSink,
        }
    }

    /// Routes suite events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.sink = sink;
        self
    }

    /// Runs every balance check and aggregates the results.
    pub async fn run(&self) -> SuiteResult {
        let start_time = now_millis();
        let ctx = SuiteContext {
            kind: SuiteKind::Balances,
            client: self.client,
            api: self.api,
            sink: self.sink,
        };
        let (with_account_check, with_time_and_limit, single) = tokio::join!(
            balances_with_account_check(ctx),
            balances_with_time_and_limit_params(ctx),
            single_balance_by_id(ctx),
        );
        let result = SuiteResult::from_results(
            SuiteKind::Balances,
            start_time,
            vec![with_account_check, with_time_and_limit, single],
        );
        self.sink.record(&AcceptanceEvent::suite_completed(&result));
        result
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Lists balances, then looks up the highest account by ordinal filter.
async fn balances_with_account_check(ctx: SuiteContext<'_>) -> TestResult {
    let mut scope = CheckScope::new(ctx, "balances_with_account_check");
    let outcome = balance_filter_round_trip(&mut scope).await;
    scope.finish(outcome)
}

/// Body of `balances_with_account_check`.
async fn balance_filter_round_trip(scope: &mut CheckScope<'_>) -> CheckOutcome {
    let balances = scope.get_list(BALANCES_PATH, BALANCES_FIELD).await?;
    let highest = checked_highest_balance(&balances, scope.api().max_limit_len())?;

    let path = format!("{BALANCES_PATH}?account.id={}&limit=1", highest.to_ordinal());
    let single = scope.get_list(&path, BALANCES_FIELD).await?;
    let record = expect_single(&single, "singleBalance")?;
    expect_identifier(Some(record), highest)?;
    Ok(ACCOUNT_CHECK_PASSED)
}

/// Re-queries one balance within `(t - 1, t + 1)` of the envelope timestamp.
async fn balances_with_time_and_limit_params(ctx: SuiteContext<'_>) -> TestResult {
    let mut scope = CheckScope::new(ctx, "balances_with_time_and_limit_params");
    let outcome = balance_time_window(&mut scope).await;
    scope.finish(outcome)
}

/// Body of `balances_with_time_and_limit_params`.
async fn balance_time_window(scope: &mut CheckScope<'_>) -> CheckOutcome {
    let envelope = scope.get(&format!("{BALANCES_PATH}?limit=1")).await?;
    let raw_timestamp = envelope_timestamp(&envelope).cloned();
    let balances = list_field(envelope, BALANCES_FIELD)?;
    expect_single(&balances, BALANCES_FIELD)?;
    let (lower, upper) = ConsensusTimestamp::from_value(&raw_timestamp?)?.window();

    let path = format!("{BALANCES_PATH}?timestamp=gt:{lower}&timestamp=lt:{upper}&limit=1");
    let windowed = scope.get_list(&path, BALANCES_FIELD).await?;
    expect_single(&windowed, BALANCES_FIELD)?;
    Ok(TIME_AND_LIMIT_PASSED)
}

/// Lists ten balances, then looks up the highest by `account.id` query.
async fn single_balance_by_id(ctx: SuiteContext<'_>) -> TestResult {
    let mut scope = CheckScope::new(ctx, "single_balance_by_id");
    let outcome = balance_query_lookup(&mut scope).await;
    scope.finish(outcome)
}

/// Body of `single_balance_by_id`.
async fn balance_query_lookup(scope: &mut CheckScope<'_>) -> CheckOutcome {
    let path = format!("{BALANCES_PATH}?limit={SINGLE_LOOKUP_PAGE}");
    let balances = scope.get_list(&path, BALANCES_FIELD).await?;
    let highest = checked_highest_balance(&balances, SINGLE_LOOKUP_PAGE)?;

    let path = format!("{BALANCES_PATH}?account.id={highest}");
    let lookup = scope.get_list(&path, BALANCES_FIELD).await?;
    expect_identifier(lookup.first(), highest)?;
    Ok(ACCOUNT_CHECK_PASSED)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Asserts a page of `limit` well-formed records; returns the highest id.
fn checked_highest_balance(balances: &[Value], limit: usize) -> Result<EntityId, CheckFailure> {
    expect_page_len(balances, BALANCES_FIELD, limit)?;
    if let Some(first) = balances.first() {
        require_fields(missing_balance_fields(first), MISSING_FIELDS)?;
    }
    highest_identifier(balances)
}
