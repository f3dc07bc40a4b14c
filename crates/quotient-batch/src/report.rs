//! Run reporting.
//!
//! Pure aggregation over the run's outcomes: global counts, a per-part
//! rollup, and a supplier-frequency table for downstream fatigue analysis
//! (a supplier hit with too many requests per week stops quoting).

use crate::jobs::{SubmissionOutcome, SubmissionStatus};
use chrono::{DateTime, Utc};
use quotient_core::RunKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A part that ended terminal with no qualifying suppliers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoSupplierPart {
    /// Line reference of the part request
    pub request_id: String,
    /// Part number that found no suppliers
    pub part_number: String,
}

/// A part whose listing fetch failed non-fatally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartFailure {
    /// Line reference of the part request
    pub request_id: String,
    /// Part number the fetch failed for
    pub part_number: String,
    /// Error detail
    pub detail: String,
}

/// Rollup status for one part request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartStatus {
    /// Every dispatched submission was sent
    Sent,
    /// Some submissions sent, some failed
    Partial,
    /// Nothing sent: dispatches failed or the listing fetch failed
    Failed,
    /// Every selected supplier was filtered out before dispatch
    Omitted,
    /// No qualifying suppliers existed
    NoSuppliers,
}

/// Jobs sent per supplier, across all parts and regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierUsage {
    /// Supplier display name
    pub supplier: String,
    /// Number of requests sent to it this run
    pub sent: usize,
}

/// Global counts for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Parts in the batch
    pub parts_total: usize,
    /// Submissions that reached a supplier
    pub sent: usize,
    /// Submissions that failed
    pub failed: usize,
    /// Candidates selected out before dispatch
    pub omitted: usize,
    /// Parts with no qualifying suppliers
    pub no_suppliers: usize,
    /// Suppliers by sent count, descending
    pub supplier_frequency: Vec<SupplierUsage>,
}

impl RunSummary {
    /// Aggregate outcomes into the run summary.
    #[must_use]
    pub fn from_outcomes(
        outcomes: &[SubmissionOutcome],
        no_suppliers: usize,
        parts_total: usize,
    ) -> Self {
        let mut sent = 0;
        let mut failed = 0;
        let mut omitted = 0;
        let mut by_supplier: BTreeMap<&str, usize> = BTreeMap::new();

        for outcome in outcomes {
            match outcome.status {
                SubmissionStatus::Sent => {
                    sent += 1;
                    *by_supplier.entry(outcome.supplier.as_str()).or_default() += 1;
                }
                SubmissionStatus::Failed => failed += 1,
                SubmissionStatus::Omitted => omitted += 1,
            }
        }

        let mut supplier_frequency: Vec<SupplierUsage> = by_supplier
            .into_iter()
            .map(|(supplier, sent)| SupplierUsage {
                supplier: supplier.to_string(),
                sent,
            })
            .collect();
        supplier_frequency.sort_by(|a, b| b.sent.cmp(&a.sent).then(a.supplier.cmp(&b.supplier)));

        Self {
            parts_total,
            sent,
            failed,
            omitted,
            no_suppliers,
            supplier_frequency,
        }
    }
}

/// Full record of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// The batch's logical identity
    pub run_key: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Every per-(part, supplier) outcome, sent, failed, and omitted
    pub outcomes: Vec<SubmissionOutcome>,
    /// Parts that found no qualifying suppliers
    pub no_suppliers: Vec<NoSupplierPart>,
    /// Parts whose listing fetch failed
    pub failed_parts: Vec<PartFailure>,
    /// Global counts
    pub summary: RunSummary,
}

impl RunReport {
    /// Assemble a report, computing the summary.
    #[must_use]
    pub fn new(
        run_key: &RunKey,
        started_at: DateTime<Utc>,
        parts_total: usize,
        outcomes: Vec<SubmissionOutcome>,
        no_suppliers: Vec<NoSupplierPart>,
        failed_parts: Vec<PartFailure>,
    ) -> Self {
        let summary = RunSummary::from_outcomes(&outcomes, no_suppliers.len(), parts_total);
        Self {
            run_id: Uuid::new_v4(),
            run_key: run_key.to_string(),
            started_at,
            finished_at: Utc::now(),
            outcomes,
            no_suppliers,
            failed_parts,
            summary,
        }
    }

    /// Status rollup per part request, keyed by request id.
    #[must_use]
    pub fn part_rollup(&self) -> BTreeMap<String, PartStatus> {
        let mut rollup: BTreeMap<String, PartStatus> = BTreeMap::new();

        for part in &self.no_suppliers {
            rollup.insert(part.request_id.clone(), PartStatus::NoSuppliers);
        }
        for part in &self.failed_parts {
            rollup.insert(part.request_id.clone(), PartStatus::Failed);
        }

        let mut counts: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
        for outcome in &self.outcomes {
            let entry = counts.entry(outcome.request_id.as_str()).or_default();
            match outcome.status {
                SubmissionStatus::Sent => entry.0 += 1,
                SubmissionStatus::Failed => entry.1 += 1,
                SubmissionStatus::Omitted => entry.2 += 1,
            }
        }

        for (request_id, (sent, failed, _omitted)) in counts {
            let status = match (sent, failed) {
                (0, 0) => PartStatus::Omitted,
                (0, _) => PartStatus::Failed,
                (_, 0) => PartStatus::Sent,
                (_, _) => PartStatus::Partial,
            };
            rollup.insert(request_id.to_string(), status);
        }

        rollup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::SubmissionStatus;
    use quotient_core::Region;

    fn outcome(request_id: &str, supplier: &str, status: SubmissionStatus) -> SubmissionOutcome {
        SubmissionOutcome {
            request_id: request_id.to_string(),
            part_number: "DS3231SN#".to_string(),
            supplier: supplier.to_string(),
            region: Region::Americas,
            status,
            requested_quantity: 100,
            adjusted_quantity: Some(100),
            supplier_quantity: Some(500),
            detail: None,
            worker_id: Some(1),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_summary_counts_by_status() {
        let outcomes = vec![
            outcome("L1", "Acme", SubmissionStatus::Sent),
            outcome("L1", "Beta", SubmissionStatus::Failed),
            outcome("L2", "Acme", SubmissionStatus::Sent),
            outcome("L2", "Gamma", SubmissionStatus::Omitted),
        ];
        let summary = RunSummary::from_outcomes(&outcomes, 1, 3);

        assert_eq!(summary.sent, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.omitted, 1);
        assert_eq!(summary.no_suppliers, 1);
        assert_eq!(summary.parts_total, 3);
    }

    #[test]
    fn test_supplier_frequency_sorted_descending() {
        let outcomes = vec![
            outcome("L1", "Acme", SubmissionStatus::Sent),
            outcome("L2", "Acme", SubmissionStatus::Sent),
            outcome("L3", "Beta", SubmissionStatus::Sent),
            // Failed submissions do not count toward supplier fatigue
            outcome("L4", "Beta", SubmissionStatus::Failed),
        ];
        let summary = RunSummary::from_outcomes(&outcomes, 0, 4);

        assert_eq!(summary.supplier_frequency.len(), 2);
        assert_eq!(summary.supplier_frequency[0].supplier, "Acme");
        assert_eq!(summary.supplier_frequency[0].sent, 2);
        assert_eq!(summary.supplier_frequency[1].supplier, "Beta");
        assert_eq!(summary.supplier_frequency[1].sent, 1);
    }

    #[test]
    fn test_part_rollup() {
        let key = RunKey::new("1008627").expect("key");
        let outcomes = vec![
            outcome("L1", "Acme", SubmissionStatus::Sent),
            outcome("L1", "Beta", SubmissionStatus::Sent),
            outcome("L2", "Acme", SubmissionStatus::Sent),
            outcome("L2", "Beta", SubmissionStatus::Failed),
            outcome("L3", "Acme", SubmissionStatus::Failed),
            outcome("L4", "Acme", SubmissionStatus::Omitted),
        ];
        let report = RunReport::new(
            &key,
            Utc::now(),
            6,
            outcomes,
            vec![NoSupplierPart {
                request_id: "L5".to_string(),
                part_number: "X".to_string(),
            }],
            vec![PartFailure {
                request_id: "L6".to_string(),
                part_number: "Y".to_string(),
                detail: "timeout".to_string(),
            }],
        );

        let rollup = report.part_rollup();
        assert_eq!(rollup["L1"], PartStatus::Sent);
        assert_eq!(rollup["L2"], PartStatus::Partial);
        assert_eq!(rollup["L3"], PartStatus::Failed);
        assert_eq!(rollup["L4"], PartStatus::Omitted);
        assert_eq!(rollup["L5"], PartStatus::NoSuppliers);
        assert_eq!(rollup["L6"], PartStatus::Failed);
    }

    #[test]
    fn test_report_serializes() {
        let key = RunKey::new("1008627").expect("key");
        let report = RunReport::new(&key, Utc::now(), 0, vec![], vec![], vec![]);
        let json = serde_json::to_string(&report).expect("serialize report");
        assert!(json.contains("\"run_key\":\"1008627\""));
    }
}
