// crates/mirror-acceptance-core/src/identifiers.rs
// ============================================================================
// Module: Entity Identifiers
// Description: Ledger entity identifiers in `shard.realm.num` form.
// Purpose: Provide a typed identifier with a lossless ordinal encoding.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Accounts and balances are keyed by a three-part entity identifier. The
//! external form is `shard.realm.num`; the ordinal form packs the segments
//! into one integer as `shard << 48 | realm << 32 | num`, with 15 shard bits,
//! 16 realm bits and 32 number bits. Conversion is exact in both directions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Bits reserved for the shard segment.
pub const SHARD_BITS: u32 = 15;
/// Bits reserved for the realm segment.
pub const REALM_BITS: u32 = 16;
/// Bits reserved for the entity number segment.
pub const NUM_BITS: u32 = 32;
/// Largest encodable shard.
pub const MAX_SHARD: u64 = (1 << SHARD_BITS) - 1;
/// Largest encodable realm.
pub const MAX_REALM: u64 = (1 << REALM_BITS) - 1;
/// Largest encodable entity number.
pub const MAX_NUM: u64 = (1 << NUM_BITS) - 1;
/// Largest valid ordinal.
pub const MAX_ORDINAL: u64 = (1 << (SHARD_BITS + REALM_BITS + NUM_BITS)) - 1;

/// Bit offset of the realm segment within an ordinal.
const REALM_SHIFT: u32 = NUM_BITS;
/// Bit offset of the shard segment within an ordinal.
const SHARD_SHIFT: u32 = NUM_BITS + REALM_BITS;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Ledger entity identifier (`shard.realm.num`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    /// Shard segment.
    shard: u64,
    /// Realm segment.
    realm: u64,
    /// Entity number segment.
    num: u64,
}

impl EntityId {
    /// Creates an identifier after range-checking every segment.
    ///
    /// # Errors
    ///
    /// Returns [`EntityIdError::OutOfRange`] when a segment exceeds its bit width.
    pub const fn new(shard: u64, realm: u64, num: u64) -> Result<Self, EntityIdError> {
        if shard > MAX_SHARD {
            return Err(EntityIdError::OutOfRange {
                segment: "shard",
                value: shard,
                max: MAX_SHARD,
            });
        }
        if realm > MAX_REALM {
            return Err(EntityIdError::OutOfRange {
                segment: "realm",
                value: realm,
                max: MAX_REALM,
            });
        }
        if num > MAX_NUM {
            return Err(EntityIdError::OutOfRange {
                segment: "num",
                value: num,
                max: MAX_NUM,
            });
        }
        Ok(Self {
            shard,
            realm,
            num,
        })
    }

    /// Decodes an ordinal into its three segments.
    ///
    /// # Errors
    ///
    /// Returns [`EntityIdError::OrdinalOutOfRange`] when bits above the
    /// encoded layout are set.
    pub const fn from_ordinal(ordinal: u64) -> Result<Self, EntityIdError> {
        if ordinal > MAX_ORDINAL {
            return Err(EntityIdError::OrdinalOutOfRange(ordinal));
        }
        Ok(Self {
            shard: ordinal >> SHARD_SHIFT,
            realm: (ordinal >> REALM_SHIFT) & MAX_REALM,
            num: ordinal & MAX_NUM,
        })
    }

    /// Encodes the identifier as a single ordinal.
    #[must_use]
    pub const fn to_ordinal(self) -> u64 {
        (self.shard << SHARD_SHIFT) | (self.realm << REALM_SHIFT) | self.num
    }

    /// Returns the shard segment.
    #[must_use]
    pub const fn shard(self) -> u64 {
        self.shard
    }

    /// Returns the realm segment.
    #[must_use]
    pub const fn realm(self) -> u64 {
        self.realm
    }

    /// Returns the entity number segment.
    #[must_use]
    pub const fn num(self) -> u64 {
        self.num
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split('.');
        let (Some(shard), Some(realm), Some(num), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(EntityIdError::Format(value.to_string()));
        };
        Self::new(parse_segment(shard)?, parse_segment(realm)?, parse_segment(num)?)
    }
}

impl TryFrom<String> for EntityId {
    type Error = EntityIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.to_string()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identifier parsing and encoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityIdError {
    /// Input is not three dot-separated segments.
    #[error("entity id `{0}` must have the form shard.realm.num")]
    Format(String),
    /// A segment is not a plain decimal number.
    #[error("entity id segment `{0}` is not a decimal number")]
    Segment(String),
    /// A segment exceeds its encoded width.
    #[error("entity id {segment} {value} exceeds maximum {max}")]
    OutOfRange {
        /// Segment label.
        segment: &'static str,
        /// Offending value.
        value: u64,
        /// Largest permitted value.
        max: u64,
    },
    /// An ordinal sets bits outside the encoded layout.
    #[error("entity ordinal {0} exceeds the encodable range")]
    OrdinalOutOfRange(u64),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses one decimal segment; signs and whitespace are rejected.
fn parse_segment(segment: &str) -> Result<u64, EntityIdError> {
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(EntityIdError::Segment(segment.to_string()));
    }
    segment.parse().map_err(|_| EntityIdError::Segment(segment.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
