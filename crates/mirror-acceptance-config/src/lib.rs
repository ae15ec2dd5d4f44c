// crates/mirror-acceptance-config/src/lib.rs
// ============================================================================
// Module: Mirror Acceptance Config Library
// Description: Canonical config model and validation for the acceptance harness.
// Purpose: Single source of truth for mirror-acceptance.toml semantics.
// Dependencies: serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! `mirror-acceptance-config` defines the configuration consumed by the mirror
//! REST acceptance suites: the API base URL, the maximum page size the API is
//! expected to honor, HTTP client limits, and the event log sink. Loading is
//! strict and fails closed on malformed files or environment overrides.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

#[cfg(test)]
mod env_tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use env::ConfigEnv;
pub use env::EnvOverrides;
pub use env::read_env_strict;
