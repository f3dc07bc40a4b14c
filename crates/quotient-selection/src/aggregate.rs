//! Listing aggregation.
//!
//! The marketplace returns many rows per supplier (packaging variants of the
//! same part). Aggregation collapses them into one candidate per
//! (supplier, region): quantities are summed over qualifying rows and the
//! most favorable date-code status wins, so a supplier with any fresh stock
//! is not penalized for also holding old stock.

use crate::datecode::{DateCodeClassifier, DateCodeStatus};
use quotient_core::{ListingRecord, Region};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A supplier's aggregated offer for one part in one region.
///
/// Built fresh per part per run from that run's listing snapshot; never
/// persisted across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierCandidate {
    /// Supplier display name
    pub supplier: String,
    /// Region the offer is from
    pub region: Region,
    /// Sum of available quantity across contributing rows
    pub total_quantity: u32,
    /// Most favorable date-code status among contributing rows
    pub date_code_status: DateCodeStatus,
    /// Raw date-code text of the most favorable row, for reporting
    pub date_code: Option<String>,
    /// Minimum order value the supplier reports, when known
    pub min_order_value: Option<f64>,
}

impl SupplierCandidate {
    /// Whether this candidate can cover the requested quantity on its own.
    #[must_use]
    pub fn meets(&self, requested_quantity: u32) -> bool {
        self.total_quantity >= requested_quantity
    }
}

/// Collapse raw listing rows into one candidate per (supplier, region).
///
/// Rows from authorized distributors and rows with zero quantity do not
/// contribute. Candidates in the excluded region are still formed so the
/// selector can report them as omitted. Output order is deterministic:
/// sorted by (region, supplier).
#[must_use]
pub fn aggregate_listings(
    listings: &[ListingRecord],
    classifier: &DateCodeClassifier,
) -> Vec<SupplierCandidate> {
    let mut by_key: BTreeMap<(Region, String), SupplierCandidate> = BTreeMap::new();

    for listing in listings {
        if listing.authorized_distributor || listing.available_quantity == 0 {
            continue;
        }
        if listing.supplier.trim().is_empty() {
            continue;
        }

        let status = classifier.classify(&listing.date_code);
        let key = (listing.region, listing.supplier.clone());

        match by_key.get_mut(&key) {
            Some(candidate) => {
                candidate.total_quantity += listing.available_quantity;
                if status.favorability() > candidate.date_code_status.favorability() {
                    candidate.date_code_status = status;
                    candidate.date_code = non_empty(&listing.date_code);
                }
                if candidate.min_order_value.is_none() {
                    candidate.min_order_value = listing.min_order_value;
                }
            }
            None => {
                by_key.insert(
                    key,
                    SupplierCandidate {
                        supplier: listing.supplier.clone(),
                        region: listing.region,
                        total_quantity: listing.available_quantity,
                        date_code_status: status,
                        date_code: non_empty(&listing.date_code),
                        min_order_value: listing.min_order_value,
                    },
                );
            }
        }
    }

    by_key.into_values().collect()
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
