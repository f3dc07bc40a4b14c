//! Shared types used across the Quotient engine.
//!
//! This module defines common newtypes and the raw marketplace data
//! contract that the selection and batch crates operate on.

use crate::error::QuotientError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for the logical batch identifier with validation.
///
/// A run key is the external request/RFQ number keying one logical batch
/// and its exclusivity lock. It must be stable for the life of the batch
/// and safe to embed in a lock file name: 1-64 characters from
/// `[A-Za-z0-9._-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunKey(String);

impl RunKey {
    /// Create a new `RunKey` from a string.
    ///
    /// # Errors
    /// Returns error if the key is empty, too long, or contains characters
    /// unsafe for a lock file name.
    pub fn new(key: impl Into<String>) -> Result<Self, QuotientError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(key: &str) -> Result<(), QuotientError> {
        static KEY_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex =
            KEY_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]{1,64}$").expect("valid regex"));

        if regex.is_match(key) {
            Ok(())
        } else {
            Err(QuotientError::Validation(format!(
                "invalid run key: must be 1-64 characters of [A-Za-z0-9._-], got '{key}'"
            )))
        }
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marketplace region a listing is offered from.
///
/// `AsiaOther` is handled by a separate purchasing channel and is never
/// selected by this engine; its candidates are reported as omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// North and South America
    Americas,
    /// Europe
    Europe,
    /// Asia and everything else; excluded from selection
    AsiaOther,
}

impl Region {
    /// Whether suppliers in this region are excluded from selection.
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        matches!(self, Self::AsiaOther)
    }

    /// Human-readable region name as the marketplace displays it.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Americas => "Americas",
            Self::Europe => "Europe",
            Self::AsiaOther => "Asia/Other",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One line to be sourced: a part and the quantity the customer asked for.
///
/// Immutable once enqueued; consumed once per batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRequest {
    /// Opaque line reference from the upstream request (e.g. an RFQ line id)
    pub request_id: String,
    /// Manufacturer part number to search for
    pub part_number: String,
    /// Requested quantity, always positive
    pub quantity: u32,
    /// Customer part code, when the upstream system tracks one
    pub customer_part_code: Option<String>,
}

impl PartRequest {
    /// Create a validated `PartRequest`.
    ///
    /// # Errors
    /// Returns a validation error for a blank part number or a zero quantity.
    pub fn new(
        request_id: impl Into<String>,
        part_number: impl Into<String>,
        quantity: u32,
        customer_part_code: Option<String>,
    ) -> Result<Self, QuotientError> {
        let request_id = request_id.into();
        let part_number = part_number.into();

        if part_number.trim().is_empty() {
            return Err(QuotientError::Validation(format!(
                "part request {request_id}: part number must not be blank"
            )));
        }
        if quantity == 0 {
            return Err(QuotientError::Validation(format!(
                "part request {request_id}: quantity must be positive"
            )));
        }

        Ok(Self {
            request_id,
            part_number,
            quantity,
            customer_part_code,
        })
    }
}

/// One raw row of marketplace data for a part, as produced by the
/// marketplace-interaction collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// The literal identifier the marketplace matched; may differ from the
    /// searched part number by a packaging suffix
    pub part_variant: String,
    /// Supplier display name
    pub supplier: String,
    /// Region the listing is offered from
    pub region: Region,
    /// Stock the supplier advertises for this row
    pub available_quantity: u32,
    /// Raw date-code text, possibly empty
    pub date_code: String,
    /// True for franchised/authorized distributors, which this sourcing
    /// channel skips
    pub authorized_distributor: bool,
    /// Minimum order value the supplier reports, when known
    pub min_order_value: Option<f64>,
}
