//! # Value Objects
//!
//! Small immutable types shared by agreements and invoices.
//!
//! Numeric fields travel as decimal text and are parsed on every access.
//! Text that does not parse resolves to [`SENTINEL_AMOUNT`], which then fails
//! whatever bound check the caller applies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value substituted for numeric text that does not parse.
pub const SENTINEL_AMOUNT: f64 = -1.0;

/// Flat string-to-string mapping used at the serialization boundary.
///
/// Payloads, patches and stored records all have this shape on the wire.
pub type RawRecord = BTreeMap<String, String>;

// =============================================================================
// DECIMAL TEXT
// =============================================================================

/// A decimal number carried as text.
///
/// The original text is preserved verbatim so that stored payloads are not
/// reformatted; [`DecimalText::value`] parses on demand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecimalText(String);

impl DecimalText {
    /// Wrap existing text without checking it.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Format a number as the shortest text that parses back to it.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        Self(format!("{value}"))
    }

    /// Parsed value, or [`SENTINEL_AMOUNT`] if the text is not a finite number.
    #[must_use]
    pub fn value(&self) -> f64 {
        parse_amount(&self.0)
    }

    /// The raw text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecimalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse decimal text, falling back to [`SENTINEL_AMOUNT`].
#[must_use]
pub fn parse_amount(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => SENTINEL_AMOUNT,
    }
}

/// Value of an optional numeric field; absent fields read as the sentinel.
#[must_use]
pub fn amount_or_sentinel(field: Option<&DecimalText>) -> f64 {
    field.map_or(SENTINEL_AMOUNT, DecimalText::value)
}

// =============================================================================
// ACTOR ROLE
// =============================================================================

/// The two parties allowed to create an agreement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Seller,
    Buyer,
}

impl ActorRole {
    /// Wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seller => "SELLER",
            Self::Buyer => "BUYER",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role text that is neither `SELLER` nor `BUYER`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown actor role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for ActorRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SELLER" => Ok(Self::Seller),
            "BUYER" => Ok(Self::Buyer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
