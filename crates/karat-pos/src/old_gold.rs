//! # Old Gold Service
//!
//! Direct cash purchases of old gold and purification dispatches, the two
//! standalone paths into and out of the scrap ledger.
//!
//! ## Ledger Discipline
//! ```text
//! buy_cash()  ──► purchase row + ledger credit     (one transaction)
//! checkout    ──► trade-in rows + ledger credits   (inside the sale tx)
//! purify()    ──► conditional ledger debit + audit (one transaction)
//! ```
//!
//! The ledger row in the database is the record of truth. `purify` never
//! pre-checks the balance in application code; it issues the conditional
//! debit and reacts to the outcome, so a concurrent dispatch can never
//! oversell a bucket.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{PosError, PosResult};
use karat_core::{
    validation, Karat, Money, OldGoldPurchase, PurificationTransaction, ScrapBucket, TradeInItem,
    Weight,
};
use karat_db::{Database, DbError, DebitOutcome};

/// A request to sell scrap from one bucket to a refinery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurificationRequest {
    pub karat: Karat,

    /// Weight physically handed over. Must not exceed the bucket balance.
    pub weight_out: Weight,

    /// Cash the refinery paid for the batch.
    pub cash_received: Money,

    /// Refinery name for the audit trail.
    pub factory_name: String,
}

/// Service for old-gold intake and scrap dispatch.
#[derive(Debug, Clone)]
pub struct OldGoldService {
    db: Database,
}

impl OldGoldService {
    /// Creates a new OldGoldService.
    pub fn new(db: Database) -> Self {
        OldGoldService { db }
    }

    /// Buys old gold for cash, outside any sale.
    ///
    /// Atomically records the purchase and credits the scrap bucket. The
    /// resulting purchase row carries no `sale_id`.
    pub async fn buy_cash(&self, item: TradeInItem) -> PosResult<OldGoldPurchase> {
        validation::validate_trade_in(&item)?;

        let purchase = OldGoldPurchase {
            id: Uuid::new_v4().to_string(),
            transaction_date: Utc::now(),
            karat: item.karat,
            weight: item.weight,
            buy_rate: item.buy_rate,
            total_value: item.value(),
            sale_id: None,
            customer_national_id: item.customer_national_id.clone(),
            customer_phone: item.customer_phone.clone(),
            description: item.description.clone(),
        };

        let scrap = self.db.scrap();
        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;
        scrap.insert_purchase(&mut tx, &purchase).await?;
        scrap.credit(&mut tx, purchase.karat, purchase.weight).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            purchase_id = %purchase.id,
            karat = %purchase.karat,
            weight = %purchase.weight,
            value = %purchase.total_value,
            "Old gold purchased for cash"
        );
        Ok(purchase)
    }

    /// Dispatches scrap to a refinery.
    ///
    /// ## Errors
    /// * `PosError::InsufficientScrap` when the bucket holds less than
    ///   `weight_out`; the ledger is untouched and the error carries the
    ///   balance the guard observed
    /// * `PosError::Validation` for malformed input, checked before any
    ///   database work
    pub async fn purify(&self, request: PurificationRequest) -> PosResult<PurificationTransaction> {
        validation::validate_weight("weightOut", request.weight_out)?;
        validation::validate_amount("cashReceived", request.cash_received)?;
        validation::validate_factory_name(&request.factory_name)?;

        let purification = PurificationTransaction {
            id: Uuid::new_v4().to_string(),
            transaction_date: Utc::now(),
            karat: request.karat,
            weight_out: request.weight_out,
            cash_received: request.cash_received,
            factory_name: request.factory_name.trim().to_string(),
        };

        let scrap = self.db.scrap();
        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        match scrap.try_debit(&mut tx, request.karat, request.weight_out).await? {
            DebitOutcome::Applied => {}
            DebitOutcome::Insufficient { available } => {
                warn!(
                    karat = %request.karat,
                    requested = %request.weight_out,
                    available = %available,
                    "Purification refused, insufficient scrap"
                );
                return Err(PosError::InsufficientScrap {
                    karat: request.karat,
                    available,
                });
            }
        }

        scrap.insert_purification(&mut tx, &purification).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            purification_id = %purification.id,
            karat = %purification.karat,
            weight_out = %purification.weight_out,
            factory = %purification.factory_name,
            "Scrap dispatched for purification"
        );
        Ok(purification)
    }

    /// Current scrap balances, one bucket per karat (zeros included).
    pub async fn scrap_inventory(&self) -> PosResult<Vec<ScrapBucket>> {
        Ok(self.db.scrap().buckets().await?)
    }

    /// Recent old-gold purchases, trade-ins and cash buys alike.
    pub async fn list_purchases(&self, limit: u32) -> PosResult<Vec<OldGoldPurchase>> {
        Ok(self.db.scrap().list_purchases(limit).await?)
    }

    /// Recent purification dispatches.
    pub async fn list_purifications(&self, limit: u32) -> PosResult<Vec<PurificationTransaction>> {
        Ok(self.db.scrap().list_purifications(limit).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
