//! Opportunity-value filtering.
//!
//! A supplier with a minimum order value the deal cannot plausibly reach
//! will not quote; contacting them wastes a submission and burns goodwill.
//! The estimate leans on franchise (authorized-channel) pricing when the
//! benchmark collaborator can supply it, and fails open when it cannot.

use crate::aggregate::SupplierCandidate;
use serde::{Deserialize, Serialize};

/// Discount multiplier when franchise stock covers the request: the buyer
/// has leverage and expects a deep discount to bother with this channel.
pub const ABUNDANT_MULTIPLIER: f64 = 0.2;

/// Multiplier when franchise stock is short: the seller has leverage.
pub const SCARCE_MULTIPLIER: f64 = 0.7;

/// Pricing context for one part, from the benchmark collaborator.
///
/// Both fields are optional; an empty signal disables the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSignal {
    /// Benchmark unit price for the part
    pub reference_unit_price: Option<f64>,
    /// Quantity available through franchise/authorized channels
    pub franchise_quantity: Option<u32>,
}

impl PriceSignal {
    /// A signal with no data; the filter keeps everything.
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Verdict for one selected candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OpportunityVerdict {
    /// The deal plausibly clears the supplier's minimum order value
    Keep,
    /// The minimum order value exceeds the estimated deal value
    Omit {
        /// Estimated deal value in the benchmark currency
        estimated_value: f64,
        /// The supplier's reported minimum order value
        min_order_value: f64,
        /// Multiplier that was applied to the benchmark price
        multiplier: f64,
    },
}

/// Decide whether a selected candidate is economically worth contacting.
///
/// The estimate uses the quantity actually being submitted (the adjusted
/// quantity caps the candidate's stock). Candidates lacking a reported
/// minimum order value, or parts lacking a benchmark price, are never
/// filtered.
#[must_use]
pub fn evaluate_opportunity(
    candidate: &SupplierCandidate,
    requested_quantity: u32,
    submit_quantity: u32,
    signal: &PriceSignal,
) -> OpportunityVerdict {
    let (Some(unit_price), Some(min_order_value)) =
        (signal.reference_unit_price, candidate.min_order_value)
    else {
        return OpportunityVerdict::Keep;
    };

    let multiplier = match signal.franchise_quantity {
        Some(franchise_qty) if franchise_qty >= requested_quantity => ABUNDANT_MULTIPLIER,
        _ => SCARCE_MULTIPLIER,
    };

    let estimated_value = unit_price * f64::from(submit_quantity) * multiplier;

    if min_order_value > estimated_value {
        OpportunityVerdict::Omit {
            estimated_value,
            min_order_value,
            multiplier,
        }
    } else {
        OpportunityVerdict::Keep
    }
}
