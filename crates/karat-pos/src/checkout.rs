//! # Checkout Service
//!
//! Turns a pending cart into a persisted sale, atomically.
//!
//! ## Submission Flow
//! ```text
//! submit_sale(cart, customer)
//!       │
//!       ├── preconditions, in order:
//!       │     1. cart has items            → EmptyCart
//!       │     2. customer name present     → MissingCustomer
//!       │     3. usable rate published     → RateUnavailable
//!       │
//!       ├── resolve every barcode          → ProductNotFound
//!       │
//!       ├── BEGIN
//!       │     per piece: AVAILABLE → SOLD  → Conflict (rolls back all)
//!       │     per piece: price = weight × bound rate + making charge
//!       │     sale header + frozen line items
//!       │     per trade-in: purchase row + scrap credit
//!       │   COMMIT
//!       │
//!       └── clear the cart (only after the commit)
//! ```
//!
//! ## Pricing Authority
//! The cart shows `estimated_price` snapshots while scanning. The number
//! that goes on the receipt is recomputed here from the piece's weight, the
//! rate bound at this instant, and the making charge. A stale cart can
//! therefore display an old figure, but it can never charge one.
//!
//! ## Conflicts
//! Two terminals can scan the same unique piece. The conditional status
//! flip decides the winner; the loser's whole submission rolls back and the
//! operator is told which barcode was lost. Nothing is retried silently.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{PosError, PosResult};
use karat_core::{
    validation, Cart, CartItem, Money, Product, Sale, SaleItem, SaleStatus, Settlement,
    REFERENCE_KARAT,
};
use karat_db::{Database, DbError};

/// Customer details captured at the register.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub phone: Option<String>,
}

/// A sale header together with its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Service that orchestrates sale submission and reversal.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    db: Database,
}

impl CheckoutService {
    /// Creates a new CheckoutService.
    pub fn new(db: Database) -> Self {
        CheckoutService { db }
    }

    /// Resolves a scanned barcode and adds the piece to the cart.
    ///
    /// ## Errors
    /// * `PosError::ProductNotFound` for an unknown barcode
    /// * `PosError::Core` for a sold piece or a duplicate scan
    pub async fn scan(&self, cart: &mut Cart, barcode: &str) -> PosResult<CartItem> {
        let product = self
            .db
            .products()
            .get_by_barcode(barcode)
            .await?
            .ok_or_else(|| PosError::ProductNotFound {
                barcode: barcode.to_string(),
            })?;

        cart.add_item(&product)?;
        Ok(CartItem::from_product(&product))
    }

    /// The settlement preview for the current cart state.
    pub fn preview(&self, cart: &Cart) -> Settlement {
        Settlement::of(cart)
    }

    /// Submits the cart as an atomic sale.
    ///
    /// On success the cart is cleared and the persisted sale returned. On
    /// any error the database is untouched and the cart keeps its contents,
    /// so the operator can correct and resubmit.
    pub async fn submit_sale(&self, cart: &mut Cart, customer: &CustomerInfo) -> PosResult<Sale> {
        // Preconditions, in a fixed order so the operator always sees the
        // same first complaint.
        if cart.is_empty() {
            return Err(PosError::EmptyCart);
        }
        if customer.name.trim().is_empty() {
            return Err(PosError::MissingCustomer);
        }
        validation::validate_customer_name(&customer.name)?;
        validation::validate_phone(customer.phone.as_deref())?;

        let applied_rate = self.bound_rate().await?;

        // The cart already rejects duplicate scans; re-check the payload so a
        // corrupted cart can never sell one piece twice.
        let barcodes = cart.barcodes();
        for (i, barcode) in barcodes.iter().enumerate() {
            if barcodes[..i].contains(barcode) {
                return Err(karat_core::CoreError::DuplicateItem {
                    barcode: barcode.clone(),
                }
                .into());
            }
        }

        // Resolve barcodes before the transaction. Availability is not
        // trusted from this read; the conditional flip below is the arbiter.
        let mut products = Vec::with_capacity(cart.item_count());
        for barcode in cart.barcodes() {
            let product = self
                .db
                .products()
                .get_by_barcode(&barcode)
                .await?
                .ok_or_else(|| PosError::ProductNotFound { barcode })?;
            products.push(product);
        }

        let now = Utc::now();
        let sale_id = Uuid::new_v4().to_string();

        let mut line_prices = Vec::with_capacity(products.len());
        let mut total_amount = Money::zero();
        for product in &products {
            let price = Self::line_price(product, applied_rate);
            total_amount += price;
            line_prices.push(price);
        }

        let old_gold_total: Money = cart.trade_ins.iter().map(|t| t.value()).sum();
        let net_cash_paid = total_amount - old_gold_total;

        let sale = Sale {
            id: sale_id.clone(),
            customer_name: customer.name.trim().to_string(),
            customer_phone: customer.phone.clone(),
            transaction_date: now,
            applied_gold_rate: applied_rate,
            total_amount,
            old_gold_total,
            net_cash_paid,
            status: SaleStatus::Completed,
        };

        let products_repo = self.db.products();
        let sales_repo = self.db.sales();
        let scrap_repo = self.db.scrap();

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        // Claim every piece first. A lost race aborts the whole submission.
        for product in &products {
            if !products_repo.mark_sold(&mut tx, &product.id).await? {
                warn!(barcode = %product.barcode, "Checkout lost piece to another terminal");
                return Err(PosError::Conflict {
                    barcode: product.barcode.clone(),
                });
            }
        }

        sales_repo.insert_sale(&mut tx, &sale).await?;

        for (product, price) in products.iter().zip(&line_prices) {
            let item = SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                product_id: product.id.clone(),
                model_name_snapshot: product.model_name.clone(),
                applied_gold_rate: applied_rate,
                weight_snapshot: product.gross_weight,
                price_snapshot: *price,
                created_at: now,
            };
            sales_repo.insert_item(&mut tx, &item).await?;
        }

        // Trade-ins enter the scrap ledger in the same transaction: the sale
        // exists if and only if its old gold was received.
        for trade_in in &cart.trade_ins {
            let purchase = karat_core::OldGoldPurchase {
                id: Uuid::new_v4().to_string(),
                transaction_date: now,
                karat: trade_in.karat,
                weight: trade_in.weight,
                buy_rate: trade_in.buy_rate,
                total_value: trade_in.value(),
                sale_id: Some(sale_id.clone()),
                customer_national_id: trade_in.customer_national_id.clone(),
                customer_phone: trade_in.customer_phone.clone(),
                description: trade_in.description.clone(),
            };
            scrap_repo.insert_purchase(&mut tx, &purchase).await?;
            scrap_repo.credit(&mut tx, trade_in.karat, trade_in.weight).await?;
        }

        tx.commit().await.map_err(DbError::from)?;

        cart.clear();

        info!(
            sale_id = %sale.id,
            items = products.len(),
            has_trade_ins = sale.old_gold_total.is_positive(),
            total = %sale.total_amount,
            net = %sale.net_cash_paid,
            "Sale submitted"
        );
        Ok(sale)
    }

    /// Reverses a completed sale.
    ///
    /// The sale is marked VOIDED and every piece returns to AVAILABLE. The
    /// record itself stays for the audit trail. Old-gold purchases taken
    /// during the sale are kept: the physical scrap was received and already
    /// sits in the ledger, so the customer settles its value in cash.
    pub async fn void_sale(&self, sale_id: &str) -> PosResult<Sale> {
        let mut sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| PosError::SaleNotFound {
                id: sale_id.to_string(),
            })?;

        if sale.status == SaleStatus::Voided {
            return Err(PosError::SaleAlreadyVoided {
                id: sale_id.to_string(),
            });
        }

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        // The conditional transition catches a concurrent void between the
        // read above and this write.
        if !self.db.sales().mark_voided(&mut tx, sale_id).await? {
            return Err(PosError::SaleAlreadyVoided {
                id: sale_id.to_string(),
            });
        }

        let restored = self.db.products().restore_for_sale(&mut tx, sale_id).await?;
        tx.commit().await.map_err(DbError::from)?;

        sale.status = SaleStatus::Voided;

        info!(sale_id = %sale.id, restored_pieces = restored, "Sale voided");
        Ok(sale)
    }

    /// Fetches one sale with its line items.
    pub async fn get_sale(&self, sale_id: &str) -> PosResult<SaleDetail> {
        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or_else(|| PosError::SaleNotFound {
                id: sale_id.to_string(),
            })?;
        let items = self.db.sales().items_for(sale_id).await?;

        Ok(SaleDetail { sale, items })
    }

    /// Lists recent sales, newest first.
    pub async fn list_sales(&self, limit: u32) -> PosResult<Vec<Sale>> {
        Ok(self.db.sales().list_recent(limit).await?)
    }

    /// The rate bound into the next submission.
    async fn bound_rate(&self) -> PosResult<Money> {
        let rate = self.db.rates().get(REFERENCE_KARAT).await?;
        rate.and_then(|r| r.checkout_rate())
            .ok_or(PosError::RateUnavailable)
    }

    /// Authoritative line price: gold value at the bound rate plus the
    /// making charge.
    fn line_price(product: &Product, rate: Money) -> Money {
        product.gross_weight.value_at(rate) + product.making_charge
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
