//! Quotient Selection - supplier scoring and selection for one part.
//!
//! This crate is the pure half of the sourcing engine: it turns a raw
//! listing snapshot into a ranked, capped, filtered set of suppliers with
//! per-supplier request quantities. Everything here is synchronous,
//! deterministic, and free of I/O; the batch crate drives it.
//!
//! # Pipeline
//!
//! 1. [`aggregate`] - collapse listing rows into per-(supplier, region) candidates
//! 2. [`datecode`] - classify freshness signals (FRESH / UNKNOWN / OLD)
//! 3. [`select`] - rank by tier, cap per region, buffer slot for unknowns
//! 4. [`quantity`] - round under-stocked requests to quotable numbers
//! 5. [`opportunity`] - drop suppliers whose minimum order value is out of reach
//!
//! [`planner::SelectionPlanner`] wires the pipeline into one call per part.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod aggregate;
pub mod datecode;
#[allow(missing_docs)]
pub mod error;
pub mod opportunity;
pub mod planner;
pub mod quantity;
pub mod select;

// Re-export commonly used types
pub use aggregate::{aggregate_listings, SupplierCandidate};
pub use datecode::{DateCodeClassifier, DateCodeStatus};
pub use error::{Result, SelectionError};
pub use opportunity::{evaluate_opportunity, OpportunityVerdict, PriceSignal};
pub use planner::{PlannedSubmission, SelectionDecision, SelectionPlanner};
pub use quantity::{adjust_quantity, QuantityAdjustment};
pub use select::{select_candidates, tier, OmittedCandidate, OmittedReason, SelectionPolicy};
