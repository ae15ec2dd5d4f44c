// crates/mirror-acceptance-cli/src/lib.rs
// ============================================================================
// Module: Mirror Acceptance CLI Library
// Description: Report rendering shared by the CLI binary and its tests.
// Purpose: Keep output formatting testable outside the entry point.
// Dependencies: mirror-acceptance-core, serde_json
// ============================================================================

//! ## Overview
//! Library surface for the `mirror-acceptance` binary. Output formatting lives
//! here so it can be unit tested without spawning the process.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod render;
