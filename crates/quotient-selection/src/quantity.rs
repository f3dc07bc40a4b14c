//! Request quantity adjustment.
//!
//! Asking an under-stocked supplier for the full shortfall discourages them
//! from quoting: they sense they cannot win the order. When stock is short,
//! the request is lowered to a round number close to their stock, never more
//! than 10% below it.

use crate::error::{Result, SelectionError};
use serde::{Deserialize, Serialize};

/// Result of adjusting a request quantity against supplier stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityAdjustment {
    /// Quantity to put on the request
    pub quantity: u32,
    /// True when the quantity was lowered from the requested amount
    pub adjusted: bool,
}

/// Compute the quantity to request from a supplier.
///
/// A supplier that can cover the request gets the requested quantity
/// unchanged. Otherwise the stock is rounded down to a step matching its
/// magnitude (5 below 50, 10 below 250, 25 below 1000, 100 from 1000 up);
/// when rounding would drop below 90% of stock, the exact stock quantity is
/// used instead.
///
/// # Errors
/// Returns a validation error when either quantity is zero.
pub fn adjust_quantity(requested_quantity: u32, stock: u32) -> Result<QuantityAdjustment> {
    if requested_quantity == 0 {
        return Err(SelectionError::InvalidQuantity(
            "requested quantity must be positive".to_string(),
        ));
    }
    if stock == 0 {
        return Err(SelectionError::InvalidQuantity(
            "supplier stock must be positive".to_string(),
        ));
    }

    if stock >= requested_quantity {
        return Ok(QuantityAdjustment {
            quantity: requested_quantity,
            adjusted: false,
        });
    }

    let step = match stock {
        0..=49 => 5,
        50..=249 => 10,
        250..=999 => 25,
        _ => 100,
    };

    let mut quantity = stock / step * step;

    // Keep the request within 10% of actual stock; a request far under
    // stock reads as a lowball and also discourages quoting.
    if f64::from(quantity) < f64::from(stock) * 0.9 {
        quantity = stock;
    }

    Ok(QuantityAdjustment {
        quantity: quantity.clamp(1, stock),
        adjusted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sufficient_stock_passes_through() {
        let adj = adjust_quantity(100, 1025).expect("adjust");
        assert_eq!(adj.quantity, 100);
        assert!(!adj.adjusted);

        let adj = adjust_quantity(100, 100).expect("adjust");
        assert_eq!(adj.quantity, 100);
        assert!(!adj.adjusted);
    }

    #[test]
    fn test_rounds_to_nearest_five_below_fifty() {
        let adj = adjust_quantity(100, 32).expect("adjust");
        assert_eq!(adj.quantity, 30);
        assert!(adj.adjusted);
    }

    #[test]
    fn test_rounds_to_nearest_ten_below_250() {
        let adj = adjust_quantity(500, 147).expect("adjust");
        assert_eq!(adj.quantity, 140);
    }

    #[test]
    fn test_rounds_to_nearest_25_below_1000() {
        let adj = adjust_quantity(5000, 980).expect("adjust");
        assert_eq!(adj.quantity, 975);
    }

    #[test]
    fn test_rounds_to_nearest_100_above_1000() {
        let adj = adjust_quantity(5000, 2380).expect("adjust");
        assert_eq!(adj.quantity, 2300);
    }

    #[test]
    fn test_ten_percent_floor_falls_back_to_stock() {
        // 7 rounds to 5, below 0.9 * 7 = 6.3, so use stock as-is
        let adj = adjust_quantity(100, 7).expect("adjust");
        assert_eq!(adj.quantity, 7);

        // 39 rounds to 35, a hair below 0.9 * 39 = 35.1
        let adj = adjust_quantity(100, 39).expect("adjust");
        assert_eq!(adj.quantity, 39);

        // 104 rounds to 100, above 0.9 * 104 = 93.6, so rounding holds
        let adj = adjust_quantity(500, 104).expect("adjust");
        assert_eq!(adj.quantity, 100);
    }

    #[test]
    fn test_bounds_hold_across_magnitudes() {
        for stock in [1u32, 3, 9, 12, 49, 51, 249, 251, 999, 1001, 12345] {
            let requested = stock + 1;
            let adj = adjust_quantity(requested, stock).expect("adjust");
            assert!(adj.quantity >= 1);
            assert!(adj.quantity <= stock, "stock {stock}");
            assert!(
                f64::from(adj.quantity) >= f64::from(stock) * 0.9,
                "stock {stock} adjusted {}",
                adj.quantity
            );
            assert!(adj.quantity < requested);
        }
    }

    #[test]
    fn test_rejects_zero_quantities() {
        assert!(adjust_quantity(0, 50).is_err());
        assert!(adjust_quantity(50, 0).is_err());
    }
}
