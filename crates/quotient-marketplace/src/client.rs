//! Marketplace interaction contract.
//!
//! The engine core only knows these traits; whether they are backed by
//! UI automation or an API client is the implementation's concern.
//! Failures come back as typed [`MarketplaceError`]s, never panics.

use crate::error::Result;
use quotient_core::{ListingRecord, Region};
use serde::{Deserialize, Serialize};

/// One quote request to place with a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Part number to request
    pub part_number: String,
    /// Supplier display name, as the marketplace shows it
    pub supplier: String,
    /// Region the supplier's offer is from
    pub region: Region,
    /// Quantity to request
    pub quantity: u32,
    /// Optional message attached to the request
    pub message: Option<String>,
}

/// A live, authenticated marketplace session.
///
/// A session is owned by exactly one worker for its lifetime; submissions
/// within it are sequential.
#[async_trait::async_trait]
pub trait MarketplaceSession: Send {
    /// Search the marketplace and return the raw listing rows for a part.
    async fn fetch_listings(&mut self, part_number: &str) -> Result<Vec<ListingRecord>>;

    /// Place one quote request with a supplier.
    async fn submit_request(&mut self, request: &QuoteRequest) -> Result<()>;

    /// Release the session's external resources. Default is a no-op.
    async fn close(&mut self) {}
}

/// Factory for marketplace sessions.
///
/// Opening a session performs login; an [`crate::MarketplaceError::Auth`]
/// failure here is fatal to the whole run.
#[async_trait::async_trait]
pub trait Marketplace: Send + Sync {
    /// Open an authenticated session for the given worker.
    async fn open_session(&self, worker_id: usize) -> Result<Box<dyn MarketplaceSession>>;
}
