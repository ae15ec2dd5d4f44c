// crates/mirror-acceptance-core/src/suites/accounts.rs
// ============================================================================
// Module: Account Acceptance Suite
// Description: Checks against the account listing and lookup endpoints.
// Dependencies: mirror-acceptance-config, tokio
// ============================================================================

//! ## Overview
//! Three independent checks run concurrently against `/accounts`:
//! - `accounts_with_account_check` round-trips the highest listed account
//!   through an `account.id` ordinal filter.
//! - `accounts_with_time_and_limit_params` re-queries the first account
//!   inside a two-second window around its balance timestamp.
//! - `single_account` fetches the highest listed account by path.

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
use crate::events::AcceptanceEvent;
use crate::events::EventSink;
use crate::events::NoopEventSink;
use crate::identifiers::EntityId;
use crate::records::account_balance_timestamp;
use crate::records::missing_account_fields;
use crate::results::SuiteKind;
use crate::results::SuiteResult;
use crate::results::TestResult;
use crate::results::now_millis;

/// Account list path.
const ACCOUNTS_PATH: &str = "/accounts";
/// List envelope field.
const ACCOUNTS_FIELD: &str = "accounts";
/// Mandatory field failure message.
const MISSING_FIELDS: &str = "account object is missing some mandatory fields";
/// Success message for the identifier round-trip checks.
const ACCOUNT_CHECK_PASSED: &str = "Successfully called accounts and performed account check";
/// Success message for the time window check.
const TIME_AND_LIMIT_PASSED: &str = "Successfully called accounts with time and limit params";

/// Acceptance suite for the account endpoints.
pub struct AccountAcceptanceSuite<'a> {
    /// REST client.
    client: &'a MirrorClient,
    /// API target settings.
    api: &'a ApiConfig,
    /// Event destination.
    sink: &'a dyn EventSink,
}

impl<'a> AccountAcceptanceSuite<'a> {
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

    /// Runs every account check and aggregates the results.
    pub async fn run(&self) -> SuiteResult {
        let start_time = now_millis();
        let ctx = SuiteContext {
            kind: SuiteKind::Accounts,
            client: self.client,
            api: self.api,
            sink: self.sink,
        };
        let (with_account_check, with_time_and_limit, single) = tokio::join!(
            accounts_with_account_check(ctx),
            accounts_with_time_and_limit_params(ctx),
            single_account(ctx),
        );
        let result = SuiteResult::from_results(
            SuiteKind::Accounts,
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

/// Lists accounts, then looks up the highest one by ordinal filter.
async fn accounts_with_account_check(ctx: SuiteContext<'_>) -> TestResult {
    let mut scope = CheckScope::new(ctx, "accounts_with_account_check");
    let outcome = account_filter_round_trip(&mut scope).await;
    scope.finish(outcome)
}

/// Body of `accounts_with_account_check`.
async fn account_filter_round_trip(scope: &mut CheckScope<'_>) -> CheckOutcome {
    let accounts = scope.get_list(ACCOUNTS_PATH, ACCOUNTS_FIELD).await?;
    let highest = checked_highest_account(&accounts, scope.api().max_limit_len())?;

    let path = format!("{ACCOUNTS_PATH}?account.id={}&type=credit&limit=1", highest.to_ordinal());
    let single = scope.get_list(&path, ACCOUNTS_FIELD).await?;
    let record = expect_single(&single, "singleAccount")?;
    expect_identifier(Some(record), highest)?;
    Ok(ACCOUNT_CHECK_PASSED)
}

/// Re-queries the first account within `(t - 1, t + 1)` of its timestamp.
async fn accounts_with_time_and_limit_params(ctx: SuiteContext<'_>) -> TestResult {
    let mut scope = CheckScope::new(ctx, "accounts_with_time_and_limit_params");
    let outcome = account_time_window(&mut scope).await;
    scope.finish(outcome)
}

/// Body of `accounts_with_time_and_limit_params`.
async fn account_time_window(scope: &mut CheckScope<'_>) -> CheckOutcome {
    let accounts = scope.get_list(&format!("{ACCOUNTS_PATH}?limit=1"), ACCOUNTS_FIELD).await?;
    let first = expect_single(&accounts, ACCOUNTS_FIELD)?;
    let (lower, upper) = account_balance_timestamp(first)?.window();

    let path = format!("{ACCOUNTS_PATH}?timestamp=gt:{lower}&timestamp=lt:{upper}&limit=1");
    let windowed = scope.get_list(&path, ACCOUNTS_FIELD).await?;
    expect_single(&windowed, ACCOUNTS_FIELD)?;
    Ok(TIME_AND_LIMIT_PASSED)
}

/// Lists accounts, then fetches the highest one by path.
async fn single_account(ctx: SuiteContext<'_>) -> TestResult {
    let mut scope = CheckScope::new(ctx, "single_account");
    let outcome = account_path_lookup(&mut scope).await;
    scope.finish(outcome)
}

/// Body of `single_account`.
async fn account_path_lookup(scope: &mut CheckScope<'_>) -> CheckOutcome {
    let accounts = scope.get_list(ACCOUNTS_PATH, ACCOUNTS_FIELD).await?;
    let highest = checked_highest_account(&accounts, scope.api().max_limit_len())?;

    let account = scope.get(&format!("{ACCOUNTS_PATH}/{highest}")).await?;
    expect_identifier(Some(&account), highest)?;
    Ok(ACCOUNT_CHECK_PASSED)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Asserts a page of `limit` well-formed records; returns the highest id.
fn checked_highest_account(accounts: &[Value], limit: usize) -> Result<EntityId, CheckFailure> {
    expect_page_len(accounts, ACCOUNTS_FIELD, limit)?;
    if let Some(first) = accounts.first() {
        require_fields(missing_account_fields(first), MISSING_FIELDS)?;
    }
    highest_identifier(accounts)
}
