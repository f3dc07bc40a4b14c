//! Batch run orchestration.
//!
//! Owns the run lifecycle: acquire the run lock, plan every part against a
//! live listing snapshot, flatten the selections into a job queue, drive the
//! worker pool, release the lock, and hand back the report. Per-job failures
//! stay inside their jobs; only precondition failures (lock contention,
//! authentication) abort the run.

use crate::error::{BatchError, Result};
use crate::jobs::{SubmissionJob, SubmissionOutcome};
use crate::lock::{ProcessProbe, RunLock, SystemProbe};
use crate::pacing::Jitter;
use crate::queue::JobQueue;
use crate::report::{NoSupplierPart, PartFailure, RunReport};
use crate::worker::{run_worker, WorkerContext};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use quotient_core::{BatchSettings, PartRequest, RunKey};
use quotient_marketplace::{Marketplace, PricingSource};
use quotient_selection::{PriceSignal, SelectionPlanner};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Drives one batch run end to end.
pub struct BatchOrchestrator {
    marketplace: Arc<dyn Marketplace>,
    pricing: Arc<dyn PricingSource>,
    planner: SelectionPlanner,
    settings: BatchSettings,
    europe_comment: String,
    lock_dir: PathBuf,
    probe: Box<dyn ProcessProbe>,
}

impl BatchOrchestrator {
    /// Create an orchestrator.
    #[must_use]
    pub fn new(
        marketplace: Arc<dyn Marketplace>,
        pricing: Arc<dyn PricingSource>,
        planner: SelectionPlanner,
        settings: BatchSettings,
        europe_comment: String,
        lock_dir: PathBuf,
    ) -> Self {
        Self {
            marketplace,
            pricing,
            planner,
            settings,
            europe_comment,
            lock_dir,
            probe: Box::new(SystemProbe),
        }
    }

    /// Replace the owner-liveness probe.
    #[must_use]
    pub fn with_probe(mut self, probe: Box<dyn ProcessProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Execute one batch run.
    ///
    /// # Errors
    /// - [`BatchError::EmptyBatch`] for an empty input set
    /// - [`BatchError::Lock`] when another live run holds the key
    /// - [`BatchError::Fatal`] when a precondition fails (authentication)
    pub async fn run(&self, run_key: &RunKey, requests: Vec<PartRequest>) -> Result<RunReport> {
        if requests.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let lock = RunLock::acquire(&self.lock_dir, run_key, self.probe.as_ref())?;
        tracing::info!(
            run_key = %run_key,
            parts = requests.len(),
            workers = self.settings.workers,
            "batch run starting"
        );

        let result = self.execute(run_key, &requests).await;

        if let Err(e) = lock.release() {
            tracing::warn!(run_key = %run_key, error = %e, "failed to remove run lock file");
        }

        match &result {
            Ok(report) => tracing::info!(
                run_key = %run_key,
                sent = report.summary.sent,
                failed = report.summary.failed,
                omitted = report.summary.omitted,
                no_suppliers = report.summary.no_suppliers,
                "batch run complete"
            ),
            Err(e) => tracing::error!(run_key = %run_key, error = %e, "batch run aborted"),
        }

        result
    }

    async fn execute(&self, run_key: &RunKey, requests: &[PartRequest]) -> Result<RunReport> {
        let started_at = Utc::now();

        let mut outcomes: Vec<SubmissionOutcome> = Vec::new();
        let mut no_suppliers: Vec<NoSupplierPart> = Vec::new();
        let mut failed_parts: Vec<PartFailure> = Vec::new();
        let mut jobs: Vec<SubmissionJob> = Vec::new();

        // Planning session: one listing snapshot per part. Failing to open
        // it at all is a precondition failure.
        let mut session = self
            .marketplace
            .open_session(0)
            .await
            .map_err(BatchError::Fatal)?;

        for request in requests {
            let listings = match session.fetch_listings(&request.part_number).await {
                Ok(listings) => listings,
                Err(e) if e.is_fatal() => {
                    session.close().await;
                    return Err(BatchError::Fatal(e));
                }
                Err(e) => {
                    tracing::warn!(
                        part = %request.part_number,
                        error = %e,
                        "listing fetch failed, part skipped"
                    );
                    failed_parts.push(PartFailure {
                        request_id: request.request_id.clone(),
                        part_number: request.part_number.clone(),
                        detail: e.to_string(),
                    });
                    continue;
                }
            };

            let signal = self.price_signal(&request.part_number).await;
            let decision = self.planner.plan(request, &listings, &signal)?;

            for omitted in &decision.omitted {
                outcomes.push(SubmissionOutcome::omitted(request, omitted));
            }

            if decision.is_empty() {
                tracing::info!(
                    part = %request.part_number,
                    "no qualifying suppliers"
                );
                no_suppliers.push(NoSupplierPart {
                    request_id: request.request_id.clone(),
                    part_number: request.part_number.clone(),
                });
            } else {
                for planned in decision.selected {
                    jobs.push(SubmissionJob {
                        request: request.clone(),
                        planned,
                    });
                }
            }
        }

        session.close().await;

        if !jobs.is_empty() {
            outcomes = self.dispatch(jobs, outcomes).await?;
        }

        outcomes.sort_by(|a, b| {
            (&a.request_id, &a.supplier, a.timestamp)
                .cmp(&(&b.request_id, &b.supplier, b.timestamp))
        });

        Ok(RunReport::new(
            run_key,
            started_at,
            requests.len(),
            outcomes,
            no_suppliers,
            failed_parts,
        ))
    }

    /// Run the worker pool over the job queue.
    ///
    /// Every worker session is opened before the first dispatch so an
    /// authentication problem surfaces as a clean abort, not a half-run.
    async fn dispatch(
        &self,
        jobs: Vec<SubmissionJob>,
        outcomes: Vec<SubmissionOutcome>,
    ) -> Result<Vec<SubmissionOutcome>> {
        let worker_count = self.settings.workers.min(jobs.len()).max(1);
        tracing::info!(jobs = jobs.len(), workers = worker_count, "dispatching");

        let mut sessions = Vec::with_capacity(worker_count);
        for worker_id in 1..=worker_count {
            match self.marketplace.open_session(worker_id).await {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    for mut session in sessions {
                        session.close().await;
                    }
                    return Err(BatchError::Fatal(e));
                }
            }
        }

        let queue = JobQueue::new(jobs);
        let shared = Arc::new(Mutex::new(outcomes));
        let cancel = CancellationToken::new();
        let jitter = Jitter::new(
            Duration::from_millis(self.settings.base_delay_ms),
            self.settings.jitter,
        );

        let mut workers = FuturesUnordered::new();
        for (index, session) in sessions.into_iter().enumerate() {
            let ctx = WorkerContext {
                worker_id: index + 1,
                queue: queue.clone(),
                jitter,
                europe_comment: self.europe_comment.clone(),
                outcomes: shared.clone(),
                cancel: cancel.clone(),
            };
            workers.push(run_worker(ctx, session));
        }

        let mut fatal = None;
        while let Some(result) = workers.next().await {
            if let Err(e) = result {
                fatal = Some(e);
            }
        }

        let outcomes = match Arc::try_unwrap(shared) {
            Ok(mutex) => mutex.into_inner(),
            Err(arc) => arc.lock().await.clone(),
        };

        match fatal {
            Some(e) => {
                tracing::error!(
                    recorded = outcomes.len(),
                    "run aborted on fatal session error"
                );
                Err(BatchError::Fatal(e))
            }
            None => Ok(outcomes),
        }
    }

    /// Query the pricing collaborator, failing open on errors.
    async fn price_signal(&self, part_number: &str) -> PriceSignal {
        let reference_unit_price = match self.pricing.reference_price(part_number).await {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(part = part_number, error = %e, "reference price lookup failed");
                None
            }
        };
        let franchise_quantity = match self.pricing.franchise_quantity(part_number).await {
            Ok(quantity) => quantity,
            Err(e) => {
                tracing::warn!(part = part_number, error = %e, "franchise quantity lookup failed");
                None
            }
        };
        PriceSignal {
            reference_unit_price,
            franchise_quantity,
        }
    }
}
