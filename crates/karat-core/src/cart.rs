//! # Cart
//!
//! The in-progress sale: scanned pieces plus captured trade-ins.
//!
//! ## Session Scope
//! A `Cart` is an explicit value owned by one terminal session and passed
//! `&mut` into every operation. It is deliberately NOT process-wide state:
//! two terminals hosted by the same backend each get their own cart.
//!
//! ## Cart Operations Flow
//! ```text
//! Scan barcode ─────► add_item()       duplicate scan rejected, qty always 1
//! Trade-in dialog ──► add_trade_in()   validated before it enters the cart
//! Click remove ─────► remove_item() / remove_trade_in()
//! Checkout OK ──────► clear()
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Weight};
use crate::types::{Product, TradeInItem};
use crate::validation::validate_trade_in;

/// A scanned piece in the cart.
///
/// ## Price Freezing
/// Name, weight and price are captured at scan time. If the product is
/// edited in inventory afterwards, this line keeps showing what was scanned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,

    pub barcode: String,

    /// Product name at time of scanning (frozen).
    pub model_name: String,

    /// Gross weight at time of scanning (frozen).
    pub weight: Weight,

    /// Indicative price at time of scanning (frozen).
    pub price: Money,

    /// Always 1: every piece is unique physical inventory. Kept as a field
    /// so the settlement math generalizes if counted stock is ever added.
    pub quantity: i64,

    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a cart line from a product lookup result.
    pub fn from_product(product: &Product) -> Self {
        CartItem {
            product_id: product.id.clone(),
            barcode: product.barcode.clone(),
            model_name: product.model_name.clone(),
            weight: product.gross_weight,
            price: product.estimated_price,
            quantity: 1,
            added_at: Utc::now(),
        }
    }
}

/// The pending sale being assembled at one terminal.
///
/// ## Invariants
/// - No two lines share a product id (duplicate scans are rejected).
/// - Every trade-in passed field validation before being appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub trade_ins: Vec<TradeInItem>,

    /// When the cart was created/last cleared.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            trade_ins: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a scanned product to the cart.
    ///
    /// ## Errors
    /// - `CoreError::ProductNotAvailable` if the piece is already sold
    /// - `CoreError::DuplicateItem` if the piece was already scanned;
    ///   the cart size never changes on this path
    pub fn add_item(&mut self, product: &Product) -> CoreResult<()> {
        if !product.is_available() {
            return Err(CoreError::ProductNotAvailable {
                barcode: product.barcode.clone(),
            });
        }

        if self.items.iter().any(|i| i.product_id == product.id) {
            return Err(CoreError::DuplicateItem {
                barcode: product.barcode.clone(),
            });
        }

        self.items.push(CartItem::from_product(product));
        Ok(())
    }

    /// Removes a line by product id.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            return Err(CoreError::ItemNotInCart {
                product_id: product_id.to_string(),
            });
        }

        Ok(())
    }

    /// Validates and appends a trade-in.
    ///
    /// The item is immutable once added; the only later operation is removal
    /// before submission.
    pub fn add_trade_in(&mut self, item: TradeInItem) -> CoreResult<()> {
        validate_trade_in(&item)?;
        self.trade_ins.push(item);
        Ok(())
    }

    /// Removes a trade-in by position.
    pub fn remove_trade_in(&mut self, index: usize) -> CoreResult<TradeInItem> {
        if index >= self.trade_ins.len() {
            return Err(CoreError::TradeInNotInCart { index });
        }

        Ok(self.trade_ins.remove(index))
    }

    /// Resets the cart to empty. Called after a confirmed submission or an
    /// explicit cancel; never called while a submission is in flight.
    pub fn clear(&mut self) {
        self.items.clear();
        self.trade_ins.clear();
        self.created_at = Utc::now();
    }

    /// Number of scanned lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart has no scanned items.
    ///
    /// Trade-ins alone do not make a cart submittable; a pure old-gold buy
    /// goes through the direct purchase path instead.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Barcodes of all lines, in scan order. This is the submission payload.
    pub fn barcodes(&self) -> Vec<String> {
        self.items.iter().map(|i| i.barcode.clone()).collect()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JewelryType, Karat, ProductStatus};

    fn test_product(id: &str, price_minor: i64) -> Product {
        Product {
            id: id.to_string(),
            barcode: format!("BC-{}", id),
            model_name: format!("Ring {}", id),
            karat: Karat::K21,
            jewelry_type: JewelryType::Ring,
            gross_weight: Weight::from_grams(10),
            making_charge: Money::from_minor(10_000),
            estimated_price: Money::from_minor(price_minor),
            cost_price: Money::from_minor(price_minor / 2),
            status: ProductStatus::Available,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_trade_in() -> TradeInItem {
        TradeInItem {
            karat: Karat::K21,
            weight: Weight::from_grams(5),
            buy_rate: Money::from_minor(100),
            customer_national_id: "29801011234567".to_string(),
            customer_phone: None,
            description: None,
        }
    }

    #[test]
    fn add_item_snapshots_product() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_item(&product).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items[0].quantity, 1);
        assert_eq!(cart.items[0].price, Money::from_minor(999));
        assert_eq!(cart.items[0].barcode, "BC-1");
    }

    #[test]
    fn duplicate_scan_is_rejected_and_size_unchanged() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_item(&product).unwrap();
        let err = cart.add_item(&product).unwrap_err();

        assert_eq!(
            err,
            CoreError::DuplicateItem {
                barcode: "BC-1".to_string()
            }
        );
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn sold_product_is_rejected() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 999);
        product.status = ProductStatus::Sold;

        assert!(matches!(
            cart.add_item(&product),
            Err(CoreError::ProductNotAvailable { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_item() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 999)).unwrap();

        cart.remove_item("1").unwrap();
        assert!(cart.is_empty());

        assert!(matches!(
            cart.remove_item("1"),
            Err(CoreError::ItemNotInCart { .. })
        ));
    }

    #[test]
    fn trade_in_is_validated_on_add() {
        let mut cart = Cart::new();

        let mut bad = test_trade_in();
        bad.customer_national_id = "123".to_string();
        assert!(matches!(
            cart.add_trade_in(bad),
            Err(CoreError::Validation(_))
        ));
        assert!(cart.trade_ins.is_empty());

        cart.add_trade_in(test_trade_in()).unwrap();
        assert_eq!(cart.trade_ins.len(), 1);
    }

    #[test]
    fn remove_trade_in_by_position() {
        let mut cart = Cart::new();
        cart.add_trade_in(test_trade_in()).unwrap();

        assert!(matches!(
            cart.remove_trade_in(5),
            Err(CoreError::TradeInNotInCart { index: 5 })
        ));

        let removed = cart.remove_trade_in(0).unwrap();
        assert_eq!(removed.weight, Weight::from_grams(5));
        assert!(cart.trade_ins.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 999)).unwrap();
        cart.add_trade_in(test_trade_in()).unwrap();

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.trade_ins.is_empty());
    }

    #[test]
    fn barcodes_preserve_scan_order() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("2", 100)).unwrap();
        cart.add_item(&test_product("1", 100)).unwrap();

        assert_eq!(cart.barcodes(), vec!["BC-2", "BC-1"]);
    }
}
