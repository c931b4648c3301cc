//! # Pricing Engine
//!
//! Pure functions computing line-item and order totals.
//!
//! ```text
//! item total  = (base_price + Σ addon.price_adjustment) × quantity
//! order total = Σ item.total_price
//! ```
//!
//! No rounding happens here; Money is exact. Negative totals (a discount
//! addon larger than the base price) are reproduced as-is, never clamped.
//! Quantity is validated by the caller; a non-positive quantity is a caller
//! error, not a pricing error. A total that leaves the `Money` range is
//! reported as [`CoreError::AmountOverflow`] instead of wrapping.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{OrderItem, SelectedAddon};

/// Computes a line total from a base price, chosen addons and a quantity.
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::pricing::compute_item_total;
/// use tally_core::SelectedAddon;
///
/// let large = SelectedAddon {
///     category_name: "Size".into(),
///     option_name: "Large".into(),
///     price_adjustment: Money::from_major(5),
/// };
/// let total = compute_item_total(Money::from_major(22), &[large], 2).unwrap();
/// assert_eq!(total, Money::from_major(54));
/// ```
pub fn compute_item_total(
    base_price: Money,
    selected_addons: &[SelectedAddon],
    quantity: i64,
) -> CoreResult<Money> {
    let unit = selected_addons
        .iter()
        .try_fold(base_price, |acc, a| acc.checked_add(a.price_adjustment))
        .ok_or_else(|| CoreError::AmountOverflow("unit price".to_string()))?;

    unit.checked_multiply_quantity(quantity)
        .ok_or_else(|| CoreError::AmountOverflow(format!("{} x {}", unit, quantity)))
}

/// Computes an order's grand total from its items.
pub fn compute_order_total(items: &[OrderItem]) -> CoreResult<Money> {
    items
        .iter()
        .try_fold(Money::zero(), |acc, i| acc.checked_add(i.total_price))
        .ok_or_else(|| CoreError::AmountOverflow("order total".to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn addon(option: &str, cents: i64) -> SelectedAddon {
        SelectedAddon {
            category_name: "Extras".to_string(),
            option_name: option.to_string(),
            price_adjustment: Money::from_cents(cents),
        }
    }

    fn item(total_cents: i64) -> OrderItem {
        OrderItem {
            product_id: "p".to_string(),
            product_name: "P".to_string(),
            base_price: Money::from_cents(total_cents),
            quantity: 1,
            selected_addons: Vec::new(),
            total_price: Money::from_cents(total_cents),
        }
    }

    #[test]
    fn test_no_addons_is_price_times_quantity() {
        for (price, qty) in [(1500, 1), (1500, 3), (0, 7), (2250, 4)] {
            assert_eq!(
                compute_item_total(Money::from_cents(price), &[], qty),
                Ok(Money::from_cents(price * qty))
            );
        }
    }

    #[test]
    fn test_addons_are_added_before_quantity() {
        let addons = [addon("Extra shot", 300), addon("Oat milk", 200)];
        let total = compute_item_total(Money::from_major(20), &addons, 3).unwrap();
        assert_eq!(total, Money::from_major(75));
    }

    #[test]
    fn test_negative_adjustment_lowers_total() {
        let discount = [addon("Loyalty", -500)];
        let total = compute_item_total(Money::from_major(15), &discount, 2).unwrap();
        assert_eq!(total, Money::from_major(20));
    }

    #[test]
    fn test_negative_total_is_not_clamped() {
        let big_discount = [addon("Voucher", -2000)];
        let total = compute_item_total(Money::from_major(15), &big_discount, 2).unwrap();
        assert_eq!(total, Money::from_major(-10));
    }

    #[test]
    fn test_order_total_sums_items() {
        let items = [item(1500), item(5400), item(-200)];
        assert_eq!(compute_order_total(&items), Ok(Money::from_cents(6700)));
        assert_eq!(compute_order_total(&[]), Ok(Money::zero()));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let items = [item(1500), item(3000)];
        let once = compute_order_total(&items);
        let twice = compute_order_total(&items);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = compute_item_total(Money::from_major(15), &[], i64::MAX);
        assert!(matches!(huge, Err(CoreError::AmountOverflow(_))));

        let addons = [addon("Gold leaf", i64::MAX)];
        let huge = compute_item_total(Money::from_major(15), &addons, 1);
        assert!(matches!(huge, Err(CoreError::AmountOverflow(_))));

        let items = [item(i64::MAX), item(1)];
        assert!(matches!(compute_order_total(&items), Err(CoreError::AmountOverflow(_))));
    }
}
