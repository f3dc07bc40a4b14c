//! Quotient Core - shared foundation for the Quotient sourcing engine.
//!
//! Everything the other crates agree on lives here: the raw marketplace
//! data contract, validated identifiers, configuration, and the umbrella
//! error type.
//!
//! # Modules
//!
//! - [`types`] - `RunKey`, `Region`, `PartRequest`, `ListingRecord`
//! - [`config`] - TOML configuration with XDG paths and env overrides
//! - [`error`] - workspace error types built on thiserror
//!
//! # Example
//!
//! ```rust
//! use quotient_core::{AppConfig, PartRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.selection.max_suppliers_per_region, 3);
//!
//! let request = PartRequest::new("L10", "DS3231SN#", 1000, None)?;
//! assert_eq!(request.quantity, 1000);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BatchSettings, BrowserSettings, MarketplaceSettings, SelectionSettings,
};
pub use error::{ConfigError, ConfigResult, QuotientError, Result};
pub use types::{ListingRecord, PartRequest, Region, RunKey};
