// crates/mirror-acceptance-core/src/runner.rs
// ============================================================================
// Module: Acceptance Runner
// Description: Entry points that run one or both suites.
// Purpose: Produce a report with suites in a fixed order.
// Dependencies: mirror-acceptance-config, tokio
// ============================================================================

//! ## Overview
//! Selected suites run concurrently. The report always lists accounts before
//! balances regardless of selection order or completion order.

use mirror_acceptance_config::ApiConfig;

use crate::client::MirrorClient;
use crate::events::EventSink;
use crate::results::AcceptanceReport;
use crate::results::SuiteKind;
use crate::results::SuiteResult;
use crate::results::now_millis;
use crate::suites::AccountAcceptanceSuite;
use crate::suites::BalanceAcceptanceSuite;

/// Runs the account suite with events discarded.
pub async fn run_account_tests(client: &MirrorClient, api: &ApiConfig) -> SuiteResult {
    AccountAcceptanceSuite::new(client, api).run().await
}

/// Runs the balance suite with events discarded.
pub async fn run_balance_tests(client: &MirrorClient, api: &ApiConfig) -> SuiteResult {
    BalanceAcceptanceSuite::new(client, api).run().await
}

/// Runs both suites.
pub async fn run_all(
    client: &MirrorClient,
    api: &ApiConfig,
    sink: &dyn EventSink,
) -> AcceptanceReport {
    run_selected(client, api, sink, &SuiteKind::ALL).await
}

/// Runs the suites named in `kinds`; duplicates run once.
pub async fn run_selected(
    client: &MirrorClient,
    api: &ApiConfig,
    sink: &dyn EventSink,
    kinds: &[SuiteKind],
) -> AcceptanceReport {
    let start_time = now_millis();
    let accounts = async {
        if kinds.contains(&SuiteKind::Accounts) {
            Some(AccountAcceptanceSuite::new(client, api).with_sink(sink).run().await)
        } else {
            None
        }
    };
    let balances = async {
        if kinds.contains(&SuiteKind::Balances) {
            Some(BalanceAcceptanceSuite::new(client, api).with_sink(sink).run().await)
        } else {
            None
        }
    };
    let (accounts, balances) = tokio::join!(accounts, balances);
    AcceptanceReport::from_suites(start_time, accounts.into_iter().chain(balances).collect())
}
