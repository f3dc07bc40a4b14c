use thiserror::Error;

/// Result type alias for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketplaceError>;

/// Errors from marketplace interaction.
///
/// Only authentication failures are fatal to a batch run; everything else
/// is recorded against the job that hit it and the run continues.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("selector not found: {0}")]
    SelectorNotFound(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("failed to parse marketplace page: {0}")]
    Parse(String),
}

impl MarketplaceError {
    /// Whether this error is a run-aborting precondition failure rather
    /// than a per-job interaction problem.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MarketplaceError::SelectorNotFound("#btnSearch".to_string());
        assert_eq!(err.to_string(), "selector not found: #btnSearch");
    }

    #[test]
    fn test_only_auth_is_fatal() {
        assert!(MarketplaceError::Auth("bad password".to_string()).is_fatal());
        assert!(!MarketplaceError::Timeout("search".to_string()).is_fatal());
        assert!(!MarketplaceError::SubmissionRejected("no RFQ option".to_string()).is_fatal());
    }
}
