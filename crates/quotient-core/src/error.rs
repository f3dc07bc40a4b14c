//! Workspace-level error types.
//!
//! Each subsystem crate carries its own error enum; `QuotientError` is the
//! umbrella for code that moves errors across crate boundaries, such as the
//! application shell.

use thiserror::Error;

/// Umbrella error for operations spanning Quotient subsystems.
#[derive(Error, Debug)]
pub enum QuotientError {
    /// Configuration failed to load, parse, or validate
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The selection pipeline rejected its input
    #[error("selection error: {0}")]
    Selection(String),

    /// Marketplace interaction failed (login, search, submission)
    #[error("marketplace error: {0}")]
    Marketplace(String),

    /// A batch run could not start or finish (locking, dispatch)
    #[error("batch error: {0}")]
    Batch(String),

    /// Input violated a structural constraint (blank part, zero quantity)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors raised while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// XDG base directories could not be resolved on this system
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// The config file is not valid TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The config could not be serialized for saving
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// The config file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value parsed but is out of range or inconsistent
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `QuotientError`.
pub type Result<T> = std::result::Result<T, QuotientError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QuotientError::Validation("quantity must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "validation error: quantity must be positive"
        );
    }

    #[test]
    fn test_config_error_display_carries_field() {
        let err = ConfigError::InvalidValue {
            field: "batch.workers".to_string(),
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for batch.workers: must be at least 1"
        );
    }

    #[test]
    fn test_subsystem_errors_convert_into_umbrella() {
        let core_err: QuotientError = ConfigError::NoConfigDir.into();
        assert!(matches!(core_err, QuotientError::Config(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let core_err: QuotientError = io_err.into();
        assert!(matches!(core_err, QuotientError::Io(_)));
    }
}
