// crates/mirror-acceptance-core/src/lib.rs
// ============================================================================
// Module: Mirror Acceptance Core
// Description: Acceptance checks for the mirror REST account and balance APIs.
// Purpose: Run fixed check suites against a live REST API and report results.
// Dependencies: bigdecimal, mirror-acceptance-config, reqwest, serde, tokio
// ============================================================================

//! ## Overview
//! This crate holds the acceptance suites and everything they depend on:
//! typed entity identifiers, raw record inspection, a bounded JSON client,
//! structured event sinks and the result model.
//! Invariants:
//! - Every check yields exactly one [`TestResult`]; errors never escape a suite.
//! - Suite counts are derived from the result list, never tracked separately.
//! - Reports list suites in a fixed order: accounts, then balances.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod events;
pub mod identifiers;
pub mod records;
pub mod results;
pub mod runner;
pub mod suites;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::FetchError;
pub use client::MirrorClient;
pub use events::AcceptanceEvent;
pub use events::EventSink;
pub use events::FileEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use events::sink_from_config;
pub use identifiers::EntityId;
pub use identifiers::EntityIdError;
pub use records::ConsensusTimestamp;
pub use records::RecordError;
pub use results::AcceptanceReport;
pub use results::SuiteKind;
pub use results::SuiteResult;
pub use results::TestResult;
pub use results::TestStatus;
pub use runner::run_account_tests;
pub use runner::run_all;
pub use runner::run_balance_tests;
pub use runner::run_selected;
pub use suites::AccountAcceptanceSuite;
pub use suites::BalanceAcceptanceSuite;
