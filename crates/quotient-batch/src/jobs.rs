//! Submission jobs and their outcomes.

use chrono::{DateTime, Utc};
use quotient_core::{PartRequest, Region};
use quotient_selection::{OmittedCandidate, PlannedSubmission};
use serde::{Deserialize, Serialize};

/// One unit of work for the worker pool: one supplier for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionJob {
    /// The part request this job belongs to
    pub request: PartRequest,
    /// The selected supplier and the quantity to submit
    pub planned: PlannedSubmission,
}

/// Terminal state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// The request reached the supplier
    Sent,
    /// The interaction failed; detail carries the error
    Failed,
    /// The supplier was selected out before dispatch; detail carries the reason
    Omitted,
}

/// Record of what happened between one part and one supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    /// Line reference of the originating part request
    pub request_id: String,
    /// Part number the request was for
    pub part_number: String,
    /// Supplier the record refers to
    pub supplier: String,
    /// Region of the supplier's offer
    pub region: Region,
    /// Terminal state
    pub status: SubmissionStatus,
    /// Quantity the customer asked for
    pub requested_quantity: u32,
    /// Quantity actually put on the request, when one was dispatched
    pub adjusted_quantity: Option<u32>,
    /// The supplier's aggregated stock at selection time
    pub supplier_quantity: Option<u32>,
    /// Error text or omission reason
    pub detail: Option<String>,
    /// Worker that handled the job; absent for omissions
    pub worker_id: Option<usize>,
    /// When the record was produced
    pub timestamp: DateTime<Utc>,
}

impl SubmissionOutcome {
    /// Record a successful submission.
    #[must_use]
    pub fn sent(job: &SubmissionJob, worker_id: usize) -> Self {
        Self::for_job(job, SubmissionStatus::Sent, None, Some(worker_id))
    }

    /// Record a failed submission with its error detail.
    #[must_use]
    pub fn failed(job: &SubmissionJob, worker_id: usize, detail: impl Into<String>) -> Self {
        Self::for_job(
            job,
            SubmissionStatus::Failed,
            Some(detail.into()),
            Some(worker_id),
        )
    }

    /// Record a candidate the selection left out.
    #[must_use]
    pub fn omitted(request: &PartRequest, omitted: &OmittedCandidate) -> Self {
        Self {
            request_id: request.request_id.clone(),
            part_number: request.part_number.clone(),
            supplier: omitted.candidate.supplier.clone(),
            region: omitted.candidate.region,
            status: SubmissionStatus::Omitted,
            requested_quantity: request.quantity,
            adjusted_quantity: None,
            supplier_quantity: Some(omitted.candidate.total_quantity),
            detail: Some(omitted.reason.to_string()),
            worker_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Whether the submission reached the supplier.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.status == SubmissionStatus::Sent
    }

    fn for_job(
        job: &SubmissionJob,
        status: SubmissionStatus,
        detail: Option<String>,
        worker_id: Option<usize>,
    ) -> Self {
        Self {
            request_id: job.request.request_id.clone(),
            part_number: job.request.part_number.clone(),
            supplier: job.planned.candidate.supplier.clone(),
            region: job.planned.candidate.region,
            status,
            requested_quantity: job.request.quantity,
            adjusted_quantity: Some(job.planned.quantity),
            supplier_quantity: Some(job.planned.candidate.total_quantity),
            detail,
            worker_id,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotient_selection::{DateCodeStatus, OmittedReason, SupplierCandidate};

    fn job() -> SubmissionJob {
        SubmissionJob {
            request: PartRequest::new("L10", "DS3231SN#", 100, None).expect("request"),
            planned: PlannedSubmission {
                candidate: SupplierCandidate {
                    supplier: "Acme".to_string(),
                    region: Region::Americas,
                    total_quantity: 32,
                    date_code_status: DateCodeStatus::Unknown,
                    date_code: None,
                    min_order_value: None,
                },
                quantity: 30,
                quantity_adjusted: true,
            },
        }
    }

    #[test]
    fn test_sent_outcome_carries_job_fields() {
        let outcome = SubmissionOutcome::sent(&job(), 2);
        assert!(outcome.is_sent());
        assert_eq!(outcome.adjusted_quantity, Some(30));
        assert_eq!(outcome.supplier_quantity, Some(32));
        assert_eq!(outcome.worker_id, Some(2));
        assert!(outcome.detail.is_none());
    }

    #[test]
    fn test_failed_outcome_carries_detail() {
        let outcome = SubmissionOutcome::failed(&job(), 1, "send button disabled");
        assert_eq!(outcome.status, SubmissionStatus::Failed);
        assert_eq!(outcome.detail.as_deref(), Some("send button disabled"));
    }

    #[test]
    fn test_omitted_outcome_uses_reason_text() {
        let request = PartRequest::new("L10", "DS3231SN#", 100, None).expect("request");
        let omitted = OmittedCandidate {
            candidate: SupplierCandidate {
                supplier: "Far Co".to_string(),
                region: Region::AsiaOther,
                total_quantity: 500,
                date_code_status: DateCodeStatus::Fresh,
                date_code: None,
                min_order_value: None,
            },
            reason: OmittedReason::RegionExcluded,
        };
        let outcome = SubmissionOutcome::omitted(&request, &omitted);
        assert_eq!(outcome.status, SubmissionStatus::Omitted);
        assert_eq!(outcome.detail.as_deref(), Some("REGION_EXCLUDED"));
        assert!(outcome.worker_id.is_none());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&SubmissionStatus::Sent).expect("serialize");
        assert_eq!(json, "\"SENT\"");
        let json = serde_json::to_string(&SubmissionStatus::Omitted).expect("serialize");
        assert_eq!(json, "\"OMITTED\"");
    }
}
