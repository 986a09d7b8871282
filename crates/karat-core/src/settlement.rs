//! # Settlement Calculator
//!
//! Pure totals derived from cart state. No side effects, no I/O, fully
//! deterministic: the same cart always settles to the same numbers.
//!
//! Totals are recomputed from scratch on every call. Nothing is cached, so
//! no stale figure can ever reach the submission step.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::money::Money;

/// The net cash movement of a pending sale.
///
/// ```text
/// subtotal        = Σ line price                (qty is always 1 today;
///                                                the sum multiplies by qty
///                                                so multi-quantity carts
///                                                would still settle right)
/// trade_in_total  = Σ trade-in weight × buy rate
/// net_amount      = subtotal − trade_in_total   (may be negative)
/// change_due      = max(0, −net_amount)         (cash the shop owes back)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub subtotal: Money,
    pub trade_in_total: Money,
    pub net_amount: Money,
    pub change_due: Money,
}

impl Settlement {
    /// Computes the settlement for the given cart state.
    pub fn of(cart: &Cart) -> Self {
        let subtotal: Money = cart.items.iter().map(|i| i.price * i.quantity).sum();
        let trade_in_total: Money = cart.trade_ins.iter().map(|t| t.value()).sum();
        let net_amount = subtotal - trade_in_total;

        Settlement {
            subtotal,
            trade_in_total,
            net_amount,
            change_due: (-net_amount).clamp_non_negative(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Weight;
    use crate::types::{JewelryType, Karat, Product, ProductStatus, TradeInItem};
    use chrono::Utc;

    fn product(id: &str, price_minor: i64) -> Product {
        Product {
            id: id.to_string(),
            barcode: format!("BC-{}", id),
            model_name: format!("Piece {}", id),
            karat: Karat::K21,
            jewelry_type: JewelryType::Chain,
            gross_weight: Weight::from_grams(8),
            making_charge: Money::from_minor(5_000),
            estimated_price: Money::from_minor(price_minor),
            cost_price: Money::from_minor(price_minor),
            status: ProductStatus::Available,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn trade_in(grams: i64, rate_minor: i64) -> TradeInItem {
        TradeInItem {
            karat: Karat::K21,
            weight: Weight::from_grams(grams),
            buy_rate: Money::from_minor(rate_minor),
            customer_national_id: "29801011234567".to_string(),
            customer_phone: None,
            description: None,
        }
    }

    #[test]
    fn empty_cart_settles_to_zero() {
        let s = Settlement::of(&Cart::new());
        assert_eq!(s.subtotal, Money::zero());
        assert_eq!(s.trade_in_total, Money::zero());
        assert_eq!(s.net_amount, Money::zero());
        assert_eq!(s.change_due, Money::zero());
    }

    #[test]
    fn subtotal_is_order_independent() {
        let mut a = Cart::new();
        a.add_item(&product("1", 1000)).unwrap();
        a.add_item(&product("2", 1500)).unwrap();

        let mut b = Cart::new();
        b.add_item(&product("2", 1500)).unwrap();
        b.add_item(&product("1", 1000)).unwrap();

        assert_eq!(Settlement::of(&a).subtotal, Settlement::of(&b).subtotal);
    }

    #[test]
    fn two_items_one_trade_in() {
        // Items 1000 + 1500, trade-in 5g at 100/g = 500.
        let mut cart = Cart::new();
        cart.add_item(&product("1", 1000)).unwrap();
        cart.add_item(&product("2", 1500)).unwrap();
        cart.add_trade_in(trade_in(5, 100)).unwrap();

        let s = Settlement::of(&cart);
        assert_eq!(s.subtotal, Money::from_minor(2500));
        assert_eq!(s.trade_in_total, Money::from_minor(500));
        assert_eq!(s.net_amount, Money::from_minor(2000));
        assert_eq!(s.change_due, Money::zero());
    }

    #[test]
    fn trade_in_exceeding_goods_value_owes_change() {
        // One item at 500, trade-in worth 800: shop owes 300.
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500)).unwrap();
        cart.add_trade_in(trade_in(8, 100)).unwrap();

        let s = Settlement::of(&cart);
        assert_eq!(s.net_amount, Money::from_minor(-300));
        assert_eq!(s.change_due, Money::from_minor(300));
    }

    #[test]
    fn net_holds_for_many_trade_ins() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10_000)).unwrap();
        for _ in 0..4 {
            cart.add_trade_in(trade_in(3, 250)).unwrap();
        }

        let s = Settlement::of(&cart);
        assert_eq!(s.trade_in_total, Money::from_minor(3000));
        assert_eq!(s.net_amount, s.subtotal - s.trade_in_total);
    }

    #[test]
    fn mutation_changes_recomputed_totals() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 1000)).unwrap();
        assert_eq!(Settlement::of(&cart).subtotal, Money::from_minor(1000));

        cart.add_trade_in(trade_in(2, 100)).unwrap();
        assert_eq!(Settlement::of(&cart).net_amount, Money::from_minor(800));

        cart.remove_trade_in(0).unwrap();
        assert_eq!(Settlement::of(&cart).net_amount, Money::from_minor(1000));
    }
}
