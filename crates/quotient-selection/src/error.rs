use thiserror::Error;

/// Errors from the pure selection pipeline.
///
/// Selection fails closed only on malformed input; data conditions like
/// "no candidates" are represented in the decision, not as errors.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// A quantity that must be positive was zero
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Result type alias for selection operations.
pub type Result<T> = std::result::Result<T, SelectionError>;
