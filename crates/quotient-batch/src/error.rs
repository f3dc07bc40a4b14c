use crate::lock::LockError;
use quotient_marketplace::MarketplaceError;
use quotient_selection::SelectionError;
use thiserror::Error;

/// Result type alias for batch operations.
pub type Result<T> = std::result::Result<T, BatchError>;

/// Errors that fail a batch run.
///
/// Per-job interaction failures never surface here; they are recorded as
/// FAILED outcomes and the run continues.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input set had no part requests
    #[error("batch has no part requests")]
    EmptyBatch,

    /// The run lock could not be acquired
    #[error(transparent)]
    Lock(#[from] LockError),

    /// A precondition failed and the run was aborted
    #[error("fatal marketplace error, run aborted: {0}")]
    Fatal(MarketplaceError),

    /// Selection rejected malformed input
    #[error(transparent)]
    Selection(#[from] SelectionError),
}
