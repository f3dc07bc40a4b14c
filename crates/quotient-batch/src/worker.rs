//! Submission worker loop.
//!
//! A worker owns one marketplace session and pulls jobs from the shared
//! queue until it is drained or the run is cancelled. A job failure is
//! recorded and the worker moves on; only a fatal session error stops the
//! run, by tripping the cancellation token so the other workers wind down
//! after their current job.

use crate::jobs::{SubmissionJob, SubmissionOutcome};
use crate::pacing::Jitter;
use crate::queue::JobQueue;
use quotient_core::Region;
use quotient_marketplace::{MarketplaceError, MarketplaceSession, QuoteRequest};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Everything one worker needs for its lifetime.
pub(crate) struct WorkerContext {
    pub worker_id: usize,
    pub queue: JobQueue,
    pub jitter: Jitter,
    pub europe_comment: String,
    pub outcomes: Arc<Mutex<Vec<SubmissionOutcome>>>,
    pub cancel: CancellationToken,
}

/// Drain the queue through one session.
///
/// Returns the fatal error when the session hit one, after recording the
/// outcome of the job that surfaced it.
pub(crate) async fn run_worker(
    ctx: WorkerContext,
    mut session: Box<dyn MarketplaceSession>,
) -> Result<(), MarketplaceError> {
    let mut fatal = None;

    while !ctx.cancel.is_cancelled() {
        let Some(job) = ctx.queue.pop().await else {
            break;
        };

        ctx.jitter.pause().await;

        let request = quote_request(&job, &ctx.europe_comment);
        match session.submit_request(&request).await {
            Ok(()) => {
                tracing::info!(
                    worker_id = ctx.worker_id,
                    part = %request.part_number,
                    supplier = %request.supplier,
                    quantity = request.quantity,
                    "request sent"
                );
                ctx.outcomes
                    .lock()
                    .await
                    .push(SubmissionOutcome::sent(&job, ctx.worker_id));
            }
            Err(e) => {
                tracing::warn!(
                    worker_id = ctx.worker_id,
                    part = %request.part_number,
                    supplier = %request.supplier,
                    error = %e,
                    "request failed"
                );
                ctx.outcomes
                    .lock()
                    .await
                    .push(SubmissionOutcome::failed(&job, ctx.worker_id, e.to_string()));

                if e.is_fatal() {
                    ctx.cancel.cancel();
                    fatal = Some(e);
                    break;
                }
            }
        }
    }

    session.close().await;
    tracing::debug!(worker_id = ctx.worker_id, "worker finished");

    match fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Build the wire request for a job. Europe-region suppliers get the
/// country-of-origin confirmation message.
fn quote_request(job: &SubmissionJob, europe_comment: &str) -> QuoteRequest {
    let message = (job.planned.candidate.region == Region::Europe && !europe_comment.is_empty())
        .then(|| europe_comment.to_string());

    QuoteRequest {
        part_number: job.request.part_number.clone(),
        supplier: job.planned.candidate.supplier.clone(),
        region: job.planned.candidate.region,
        quantity: job.planned.quantity,
        message,
    }
}
