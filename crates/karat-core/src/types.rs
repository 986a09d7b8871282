//! # Domain Types
//!
//! Core domain types for the jewelry POS.
//!
//! ## Type Hierarchy
//! ```text
//! Product ──► CartItem (snapshot) ──► SaleItem (snapshot)
//!                                        │
//! TradeInItem ──► OldGoldPurchase ───────┤ (linked by sale_id)
//!                       │                │
//!                       ▼                ▼
//!                 ScrapBucket          Sale
//!                       │
//!                       ▼
//!               PurificationTransaction
//! ```
//!
//! ## Snapshot Pattern
//! Prices and weights are frozen into cart lines and sale items at the moment
//! they are captured. Later edits to a product never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::{Money, Weight};

// =============================================================================
// Karat (Purity)
// =============================================================================

/// Gold fineness classification.
///
/// The karat is the key for both pricing (gold rates) and scrap accounting
/// (one ledger bucket per karat). The wire and database representation is
/// the `KARAT_NN` form used across the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum Karat {
    #[serde(rename = "KARAT_18")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "KARAT_18"))]
    K18,
    #[serde(rename = "KARAT_21")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "KARAT_21"))]
    K21,
    #[serde(rename = "KARAT_24")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "KARAT_24"))]
    K24,
}

impl Karat {
    /// All karats, in ascending fineness. Used to materialize every scrap
    /// bucket even when no gold of that purity was ever traded in.
    pub const ALL: [Karat; 3] = [Karat::K18, Karat::K21, Karat::K24];

    /// The wire/database name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Karat::K18 => "KARAT_18",
            Karat::K21 => "KARAT_21",
            Karat::K24 => "KARAT_24",
        }
    }
}

impl fmt::Display for Karat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// Jewelry category, kept for inventory filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum JewelryType {
    Ring,
    Chain,
    Bracelet,
    Earring,
    Coin,
    Other,
}

/// Lifecycle of a unique physical piece.
///
/// There is no counted stock: each barcode is one item, and selling it flips
/// `Available` to `Sold`. The conditional flip in the database is what makes
/// two terminals scanning the same piece a detectable conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Available,
    Sold,
}

/// A jewelry piece in inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Scannable barcode, unique per piece.
    pub barcode: String,

    /// Display name shown to the cashier and on the receipt.
    pub model_name: String,

    /// Gold purity of the piece.
    pub karat: Karat,

    pub jewelry_type: JewelryType,

    /// Gross weight of the piece.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "gross_weight_mg"))]
    pub gross_weight: Weight,

    /// Flat workmanship fee added on top of the gold value at checkout.
    pub making_charge: Money,

    /// Indicative price shown while scanning; the authoritative line price
    /// is recomputed from weight x rate + making charge at submission.
    pub estimated_price: Money,

    /// Acquisition cost (gold + labor), for margin reporting.
    pub cost_price: Money,

    pub status: ProductStatus,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the piece can still be scanned into a cart.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == ProductStatus::Available
    }
}

// =============================================================================
// Trade-In (Old Gold)
// =============================================================================

/// Old gold brought in by a customer.
///
/// Captured by the trade-in dialog and appended to the pending cart, or
/// submitted on its own as a direct cash purchase. Immutable once added,
/// except for removal before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInItem {
    pub karat: Karat,

    /// Weight of the old gold, must be positive.
    pub weight: Weight,

    /// Agreed price per gram, must be positive.
    pub buy_rate: Money,

    /// Required for anti-fencing audit: exactly 14 digits.
    pub customer_national_id: String,

    /// Optional, 10-15 digits when present.
    pub customer_phone: Option<String>,

    pub description: Option<String>,
}

impl TradeInItem {
    /// The cash value of this item: weight x buy rate.
    #[inline]
    pub fn value(&self) -> Money {
        self.weight.value_at(self.buy_rate)
    }
}

/// A persisted old-gold purchase.
///
/// `sale_id` is set when the gold was traded in against a sale and `None`
/// for a direct cash buy. Either way the scrap ledger was credited in the
/// same transaction that wrote this row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OldGoldPurchase {
    pub id: String,
    pub transaction_date: DateTime<Utc>,
    pub karat: Karat,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "weight_mg"))]
    pub weight: Weight,
    pub buy_rate: Money,
    pub total_value: Money,
    pub sale_id: Option<String>,
    pub customer_national_id: String,
    pub customer_phone: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// The status of a sale transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleStatus {
    /// Paid and finalized.
    Completed,
    /// Reversed: products returned to available.
    Voided,
}

/// A completed sale.
///
/// Created atomically at submission and never mutated afterwards, except by
/// the explicit void operation that reverses its effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub transaction_date: DateTime<Utc>,

    /// The gold rate bound at the instant of checkout. Immutable even if the
    /// rate table changes moments later.
    pub applied_gold_rate: Money,

    /// Gross total: value of the new items sold.
    pub total_amount: Money,

    /// Value deducted for traded-in old gold.
    pub old_gold_total: Money,

    /// total_amount - old_gold_total. Negative means the shop paid the
    /// customer the difference in cash.
    pub net_cash_paid: Money,

    pub status: SaleStatus,
}

/// A line item in a sale, frozen at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub model_name_snapshot: String,
    pub applied_gold_rate: Money,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "weight_snapshot_mg"))]
    pub weight_snapshot: Weight,
    pub price_snapshot: Money,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Scrap Ledger
// =============================================================================

/// One bucket of the scrap ledger: accumulated old gold per karat.
///
/// Available weight is non-negative by invariant; credits (old-gold
/// purchases) and debits (purifications) are the only mutators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ScrapBucket {
    pub karat: Karat,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "weight_mg"))]
    pub available: Weight,
}

/// A recorded sale of scrap to a refinery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PurificationTransaction {
    pub id: String,
    pub transaction_date: DateTime<Utc>,
    pub karat: Karat,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "weight_out_mg"))]
    pub weight_out: Weight,
    pub cash_received: Money,
    pub factory_name: String,
}

// =============================================================================
// Gold Rate
// =============================================================================

/// The current buy/sell price per gram for one karat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct GoldRate {
    pub karat: Karat,
    pub buy_rate: Money,
    pub sell_rate: Money,
    pub updated_at: DateTime<Utc>,
}

impl GoldRate {
    /// The rate bound into a checkout: sell rate, falling back to buy rate
    /// when no sell rate has been entered. `None` when neither is positive.
    pub fn checkout_rate(&self) -> Option<Money> {
        if self.sell_rate.is_positive() {
            Some(self.sell_rate)
        } else if self.buy_rate.is_positive() {
            Some(self.buy_rate)
        } else {
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn karat_wire_names() {
        assert_eq!(Karat::K21.as_str(), "KARAT_21");
        assert_eq!(format!("{}", Karat::K18), "KARAT_18");
    }

    #[test]
    fn trade_in_value() {
        let item = TradeInItem {
            karat: Karat::K21,
            weight: Weight::from_grams(5),
            buy_rate: Money::from_minor(100),
            customer_national_id: "12345678901234".to_string(),
            customer_phone: None,
            description: None,
        };
        assert_eq!(item.value(), Money::from_minor(500));
    }

    #[test]
    fn checkout_rate_prefers_sell() {
        let mut rate = GoldRate {
            karat: Karat::K21,
            buy_rate: Money::from_minor(290_000),
            sell_rate: Money::from_minor(300_000),
            updated_at: Utc::now(),
        };
        assert_eq!(rate.checkout_rate(), Some(Money::from_minor(300_000)));

        rate.sell_rate = Money::zero();
        assert_eq!(rate.checkout_rate(), Some(Money::from_minor(290_000)));

        rate.buy_rate = Money::zero();
        assert_eq!(rate.checkout_rate(), None);
    }
}
