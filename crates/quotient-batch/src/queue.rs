//! Shared FIFO job queue.
//!
//! The queue is filled once before the workers start and only drained after
//! that, so a `None` from `pop` means the run is out of work, not that more
//! might arrive.

use crate::jobs::SubmissionJob;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// FIFO queue of submission jobs shared by the worker pool.
#[derive(Debug, Clone)]
pub struct JobQueue {
    inner: Arc<Mutex<VecDeque<SubmissionJob>>>,
}

impl JobQueue {
    /// Build a queue from the flattened (part, supplier) jobs.
    #[must_use]
    pub fn new(jobs: Vec<SubmissionJob>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(jobs.into())),
        }
    }

    /// Take the next job, or `None` when the queue is drained.
    pub async fn pop(&self) -> Option<SubmissionJob> {
        self.inner.lock().await.pop_front()
    }

    /// Number of jobs still queued.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether the queue is drained.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
