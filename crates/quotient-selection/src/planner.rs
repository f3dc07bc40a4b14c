//! Per-part selection planning.
//!
//! The planner wires aggregation, ranking, quantity adjustment, and the
//! opportunity filter into one synchronous pass from a listing snapshot to a
//! `SelectionDecision`. It performs no I/O; the orchestrator feeds it.

use crate::aggregate::{aggregate_listings, SupplierCandidate};
use crate::datecode::DateCodeClassifier;
use crate::error::Result;
use crate::opportunity::{evaluate_opportunity, OpportunityVerdict, PriceSignal};
use crate::quantity::adjust_quantity;
use crate::select::{select_candidates, OmittedCandidate, OmittedReason, SelectionPolicy};
use quotient_core::{ListingRecord, PartRequest, SelectionSettings};
use serde::{Deserialize, Serialize};

/// A selected supplier with the quantity that will be submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSubmission {
    /// The chosen candidate
    pub candidate: SupplierCandidate,
    /// Quantity to put on the request
    pub quantity: u32,
    /// True when the quantity was lowered from the requested amount
    pub quantity_adjusted: bool,
}

/// Outcome of planning one part: who to contact and who was left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionDecision {
    /// Suppliers to contact, in rank order
    pub selected: Vec<PlannedSubmission>,
    /// Candidates left out, with reasons
    pub omitted: Vec<OmittedCandidate>,
}

impl SelectionDecision {
    /// Whether nothing was selected (terminal no-suppliers for the part).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Plans supplier selection for one part at a time.
#[derive(Debug, Clone)]
pub struct SelectionPlanner {
    policy: SelectionPolicy,
    classifier: DateCodeClassifier,
}

impl SelectionPlanner {
    /// Create a planner from explicit policy and classifier.
    #[must_use]
    pub fn new(policy: SelectionPolicy, classifier: DateCodeClassifier) -> Self {
        Self { policy, classifier }
    }

    /// Create a planner from configuration.
    #[must_use]
    pub fn from_settings(settings: &SelectionSettings) -> Self {
        Self::new(
            SelectionPolicy {
                cap_per_region: settings.max_suppliers_per_region,
            },
            DateCodeClassifier::new(settings.date_code_window_years),
        )
    }

    /// Turn a part's listing snapshot into a selection decision.
    ///
    /// # Errors
    /// Only on malformed quantities, which a validated `PartRequest` and the
    /// aggregation filters rule out in practice.
    pub fn plan(
        &self,
        request: &PartRequest,
        listings: &[ListingRecord],
        signal: &PriceSignal,
    ) -> Result<SelectionDecision> {
        let candidates = aggregate_listings(listings, &self.classifier);
        let (selected, mut omitted) =
            select_candidates(candidates, request.quantity, &self.policy);

        let mut planned = Vec::with_capacity(selected.len());
        for candidate in selected {
            let adjustment = adjust_quantity(request.quantity, candidate.total_quantity)?;

            match evaluate_opportunity(&candidate, request.quantity, adjustment.quantity, signal) {
                OpportunityVerdict::Keep => planned.push(PlannedSubmission {
                    candidate,
                    quantity: adjustment.quantity,
                    quantity_adjusted: adjustment.adjusted,
                }),
                OpportunityVerdict::Omit {
                    estimated_value,
                    min_order_value,
                    ..
                } => {
                    tracing::debug!(
                        part = %request.part_number,
                        supplier = %candidate.supplier,
                        estimated_value,
                        min_order_value,
                        "supplier omitted, minimum order value out of reach"
                    );
                    omitted.push(OmittedCandidate {
                        candidate,
                        reason: OmittedReason::OpportunityFiltered,
                    });
                }
            }
        }

        tracing::debug!(
            part = %request.part_number,
            selected = planned.len(),
            omitted = omitted.len(),
            "selection planned"
        );

        Ok(SelectionDecision {
            selected: planned,
            omitted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotient_core::Region;

    fn planner() -> SelectionPlanner {
        SelectionPlanner::new(
            SelectionPolicy::default(),
            DateCodeClassifier::new(2).with_current_year(2026),
        )
    }

    fn listing(supplier: &str, region: Region, qty: u32, dc: &str) -> ListingRecord {
        ListingRecord {
            part_variant: "DS3231SN#".to_string(),
            supplier: supplier.to_string(),
            region,
            available_quantity: qty,
            date_code: dc.to_string(),
            authorized_distributor: false,
            min_order_value: None,
        }
    }

    #[test]
    fn test_single_supplier_aggregates_and_meets() {
        // Five rows for one supplier, quantities summing past the request
        let request = PartRequest::new("L1", "DS3231SN#", 100, None).expect("request");
        let listings = vec![
            listing("Acme", Region::Americas, 500, ""),
            listing("Acme", Region::Americas, 500, ""),
            listing("Acme", Region::Americas, 10, ""),
            listing("Acme", Region::Americas, 10, ""),
            listing("Acme", Region::Americas, 5, ""),
        ];
        let decision = planner()
            .plan(&request, &listings, &PriceSignal::absent())
            .expect("plan");

        assert_eq!(decision.selected.len(), 1);
        let planned = &decision.selected[0];
        assert_eq!(planned.candidate.total_quantity, 1025);
        assert_eq!(planned.quantity, 100);
        assert!(!planned.quantity_adjusted);
    }

    #[test]
    fn test_understocked_supplier_gets_adjusted_quantity() {
        let request = PartRequest::new("L1", "DS3231SN#", 100, None).expect("request");
        let listings = vec![listing("Acme", Region::Americas, 32, "")];
        let decision = planner()
            .plan(&request, &listings, &PriceSignal::absent())
            .expect("plan");

        assert_eq!(decision.selected.len(), 1);
        assert_eq!(decision.selected[0].quantity, 30);
        assert!(decision.selected[0].quantity_adjusted);
    }

    #[test]
    fn test_excluded_region_reported_omitted() {
        let request = PartRequest::new("L1", "DS3231SN#", 100, None).expect("request");
        let listings = vec![
            listing("Acme", Region::Americas, 500, ""),
            listing("Acme", Region::AsiaOther, 500, ""),
        ];
        let decision = planner()
            .plan(&request, &listings, &PriceSignal::absent())
            .expect("plan");

        assert_eq!(decision.selected.len(), 1);
        assert_eq!(decision.selected[0].candidate.region, Region::Americas);
        assert_eq!(decision.omitted.len(), 1);
        assert_eq!(decision.omitted[0].reason, OmittedReason::RegionExcluded);
        assert_eq!(decision.omitted[0].candidate.region, Region::AsiaOther);
    }

    #[test]
    fn test_opportunity_filter_moves_candidate_to_omitted() {
        let request = PartRequest::new("L1", "DS3231SN#", 500, None).expect("request");
        let mut row = listing("Acme", Region::Americas, 500, "");
        row.min_order_value = Some(150.0);
        let signal = PriceSignal {
            reference_unit_price: Some(1.0),
            franchise_quantity: Some(1000),
        };
        let decision = planner().plan(&request, &[row], &signal).expect("plan");

        assert!(decision.is_empty());
        assert_eq!(decision.omitted.len(), 1);
        assert_eq!(
            decision.omitted[0].reason,
            OmittedReason::OpportunityFiltered
        );
    }

    #[test]
    fn test_no_listings_is_empty_decision() {
        let request = PartRequest::new("L1", "DS3231SN#", 100, None).expect("request");
        let decision = planner()
            .plan(&request, &[], &PriceSignal::absent())
            .expect("plan");
        assert!(decision.is_empty());
        assert!(decision.omitted.is_empty());
    }
}
