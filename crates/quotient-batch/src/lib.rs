//! Quotient Batch - run orchestration for parallel quote submission.
//!
//! This crate turns a list of part requests into submitted quote requests:
//! it holds the run-exclusivity lock, plans every part through the selection
//! pipeline, flattens the selections into one FIFO job queue, and drains it
//! with a bounded pool of workers, each owning its own marketplace session
//! and pacing its submissions with randomized delays.
//!
//! # Modules
//!
//! - [`lock`] - run-exclusivity lock with stale-owner reclaim
//! - [`queue`] - shared FIFO job queue
//! - [`pacing`] - jittered submission delays
//! - [`jobs`] - submission jobs and outcomes
//! - [`orchestrator`] - run lifecycle
//! - [`report`] - outcome aggregation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod error;
pub mod jobs;
pub mod lock;
pub mod orchestrator;
pub mod pacing;
pub mod queue;
pub mod report;
mod worker;

// Re-export commonly used types
pub use error::{BatchError, Result};
pub use jobs::{SubmissionJob, SubmissionOutcome, SubmissionStatus};
pub use lock::{LockError, ProcessProbe, RunLock, SystemProbe};
pub use orchestrator::BatchOrchestrator;
pub use pacing::Jitter;
pub use queue::JobQueue;
pub use report::{
    NoSupplierPart, PartFailure, PartStatus, RunReport, RunSummary, SupplierUsage,
};
