// crates/mirror-acceptance-core/src/records.rs
// ============================================================================
// Module: API Records
// Description: Structural checks over account and balance records.
// Purpose: Inspect raw JSON records without trusting their shape.
// Dependencies: bigdecimal, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Records returned by the REST API are inspected as raw JSON so that a
//! missing field becomes a reportable failure rather than a decode error.
//! A field counts as present when its key exists, even when the value is
//! `null`. Consensus timestamps are `seconds.nanos` decimals and are handled
//! with exact decimal arithmetic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Value;
use thiserror::Error;

use crate::identifiers::EntityId;

// ============================================================================
// SECTION: Field Tables
// ============================================================================

/// Identifier field shared by account and balance records.
pub const IDENTIFIER_FIELD: &str = "account";

/// Top-level fields every account record must expose.
pub const ACCOUNT_MANDATORY_FIELDS: [&str; 6] =
    ["balance", "account", "expiry_timestamp", "auto_renew_period", "key", "deleted"];

/// Fields the nested account `balance` object must expose.
pub const ACCOUNT_BALANCE_MANDATORY_FIELDS: [&str; 2] = ["timestamp", "balance"];

/// Fields every balance record must expose.
pub const BALANCE_MANDATORY_FIELDS: [&str; 2] = ["account", "balance"];

// ============================================================================
// SECTION: Field Checks
// ============================================================================

/// Returns the mandatory account fields absent from `record`.
///
/// Nested balance fields are reported as `balance.<field>`.
#[must_use]
pub fn missing_account_fields(record: &Value) -> Vec<String> {
    let mut missing = missing_fields(record, &ACCOUNT_MANDATORY_FIELDS);
    let nested = record.get("balance").unwrap_or(&Value::Null);
    missing.extend(
        missing_fields(nested, &ACCOUNT_BALANCE_MANDATORY_FIELDS)
            .into_iter()
            .map(|field| format!("balance.{field}")),
    );
    missing
}

/// Returns the mandatory balance fields absent from `record`.
#[must_use]
pub fn missing_balance_fields(record: &Value) -> Vec<String> {
    missing_fields(record, &BALANCE_MANDATORY_FIELDS)
}

/// Lists the `fields` whose keys are absent from `record`.
fn missing_fields(record: &Value, fields: &[&str]) -> Vec<String> {
    let object = record.as_object();
    fields
        .iter()
        .filter(|field| !object.is_some_and(|map| map.contains_key(**field)))
        .map(|field| (*field).to_string())
        .collect()
}

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Parses the `account` identifier of a record.
///
/// # Errors
///
/// Returns [`RecordError`] when the field is missing, not a string, or not a
/// valid entity identifier.
pub fn record_entity_id(record: &Value) -> Result<EntityId, RecordError> {
    let raw = record
        .get(IDENTIFIER_FIELD)
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingIdentifier)?;
    EntityId::from_str(raw).map_err(|err| RecordError::InvalidIdentifier(err.to_string()))
}

/// Returns the highest identifier ordinal among `records`, or `None` when
/// the slice is empty.
///
/// # Errors
///
/// Propagates the first identifier that fails to parse.
pub fn highest_entity_ordinal(records: &[Value]) -> Result<Option<u64>, RecordError> {
    let mut highest: Option<u64> = None;
    for record in records {
        let ordinal = record_entity_id(record)?.to_ordinal();
        highest = Some(highest.map_or(ordinal, |current| current.max(ordinal)));
    }
    Ok(highest)
}

// ============================================================================
// SECTION: Timestamps
// ============================================================================

/// Consensus timestamp in `seconds.nanos` decimal form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConsensusTimestamp(BigDecimal);

impl ConsensusTimestamp {
    /// Parses a timestamp from a JSON string or number.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidTimestamp`] for any other JSON type or a
    /// string that is not a decimal number.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        match value {
            Value::String(text) => text.parse(),
            Value::Number(number) => number.to_string().parse(),
            other => Err(RecordError::InvalidTimestamp(other.to_string())),
        }
    }

    /// Returns the exclusive `(t - 1, t + 1)` window around this timestamp.
    #[must_use]
    pub fn window(&self) -> (Self, Self) {
        let one = BigDecimal::from(1);
        (Self(&self.0 - &one), Self(&self.0 + &one))
    }
}

impl FromStr for ConsensusTimestamp {
    type Err = RecordError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let is_decimal = !trimmed.is_empty()
            && trimmed.bytes().all(|byte| byte.is_ascii_digit() || byte == b'.')
            && trimmed.bytes().filter(|byte| *byte == b'.').count() <= 1
            && !trimmed.starts_with('.')
            && !trimmed.ends_with('.');
        if !is_decimal {
            return Err(RecordError::InvalidTimestamp(value.to_string()));
        }
        BigDecimal::from_str(trimmed)
            .map(Self)
            .map_err(|_| RecordError::InvalidTimestamp(value.to_string()))
    }
}

impl fmt::Display for ConsensusTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reads the nested `balance.timestamp` of an account record.
///
/// # Errors
///
/// Returns [`RecordError`] when the field is missing or not a decimal.
pub fn account_balance_timestamp(record: &Value) -> Result<ConsensusTimestamp, RecordError> {
    let raw = record
        .get("balance")
        .and_then(|balance| balance.get("timestamp"))
        .ok_or(RecordError::MissingTimestamp("balance.timestamp"))?;
    ConsensusTimestamp::from_value(raw)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Record inspection errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The record carries no string identifier.
    #[error("record is missing a string `account` identifier")]
    MissingIdentifier,
    /// The identifier does not parse.
    #[error("record identifier is invalid: {0}")]
    InvalidIdentifier(String),
    /// A timestamp field is absent.
    #[error("record is missing `{0}`")]
    MissingTimestamp(&'static str),
    /// A timestamp is not a `seconds.nanos` decimal.
    #[error("timestamp `{0}` is not a decimal seconds.nanos value")]
    InvalidTimestamp(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
