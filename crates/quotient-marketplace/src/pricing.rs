//! Pricing/benchmark contract.
//!
//! An optional collaborator supplying franchise-channel reference prices
//! and availability, used by the opportunity filter. Absent data means the
//! filter fails open, so [`NoPricing`] is a valid production choice.

use crate::error::Result;

/// Source of benchmark pricing data for a part.
#[async_trait::async_trait]
pub trait PricingSource: Send + Sync {
    /// Benchmark unit price for the part, when the collaborator has one.
    async fn reference_price(&self, part_number: &str) -> Result<Option<f64>>;

    /// Quantity available through franchise/authorized channels.
    async fn franchise_quantity(&self, part_number: &str) -> Result<Option<u32>>;
}

/// Pricing source with no data; every part goes unfiltered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPricing;

#[async_trait::async_trait]
impl PricingSource for NoPricing {
    async fn reference_price(&self, _part_number: &str) -> Result<Option<f64>> {
        Ok(None)
    }

    async fn franchise_quantity(&self, _part_number: &str) -> Result<Option<u32>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_pricing_is_always_absent() {
        let source = NoPricing;
        assert_eq!(source.reference_price("DS3231SN#").await.expect("price"), None);
        assert_eq!(
            source.franchise_quantity("DS3231SN#").await.expect("qty"),
            None
        );
    }
}
