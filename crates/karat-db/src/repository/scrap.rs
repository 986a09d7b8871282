//! # Scrap Ledger Repository
//!
//! The scrap inventory ledger of record, plus the old-gold purchase and
//! purification audit trails that feed and drain it.
//!
//! ## The No-Oversell Guard
//! ```text
//! UPDATE scrap_inventory
//! SET weight_mg = weight_mg - ?2
//! WHERE karat = ?1 AND weight_mg >= ?2
//! ```
//!
//! The availability check and the debit are one statement. Two concurrent
//! purifications against the same bucket serialize inside SQLite; the second
//! sees the post-debit balance and matches zero rows if it would overdraw.
//! There is no pre-read for a stale balance to leak through, and the schema's
//! `CHECK (weight_mg >= 0)` backs the guard up.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use karat_core::{Karat, OldGoldPurchase, PurificationTransaction, ScrapBucket, Weight};

const PURCHASE_COLUMNS: &str = "id, transaction_date, karat, weight_mg, buy_rate, \
     total_value, sale_id, customer_national_id, customer_phone, description";

const PURIFICATION_COLUMNS: &str =
    "id, transaction_date, karat, weight_out_mg, cash_received, factory_name";

/// Outcome of a conditional scrap debit.
///
/// Insufficient weight is a business result, not a database failure, so it
/// travels as a value rather than a `DbError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// The ledger held enough weight and the debit was applied.
    Applied,
    /// The ledger held less than requested. Nothing was changed; `available`
    /// is the balance observed after the update matched zero rows.
    Insufficient { available: Weight },
}

/// Repository for the scrap ledger and its audit trails.
#[derive(Debug, Clone)]
pub struct ScrapRepository {
    pool: SqlitePool,
}

impl ScrapRepository {
    /// Creates a new ScrapRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ScrapRepository { pool }
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Current balance of one bucket. Missing row reads as zero.
    pub async fn available(&self, karat: Karat) -> DbResult<Weight> {
        let mg: Option<i64> =
            sqlx::query_scalar("SELECT weight_mg FROM scrap_inventory WHERE karat = ?1")
                .bind(karat)
                .fetch_optional(&self.pool)
                .await?;

        Ok(Weight::from_milligrams(mg.unwrap_or(0)))
    }

    /// Balance read on an open transaction. Used after a failed debit so the
    /// reported figure is the one the guard actually saw.
    pub async fn available_on(&self, conn: &mut SqliteConnection, karat: Karat) -> DbResult<Weight> {
        let mg: Option<i64> =
            sqlx::query_scalar("SELECT weight_mg FROM scrap_inventory WHERE karat = ?1")
                .bind(karat)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(Weight::from_milligrams(mg.unwrap_or(0)))
    }

    /// All buckets, one per karat, zero-weight buckets included.
    pub async fn buckets(&self) -> DbResult<Vec<ScrapBucket>> {
        let mut buckets = Vec::with_capacity(Karat::ALL.len());
        for karat in Karat::ALL {
            buckets.push(ScrapBucket {
                karat,
                available: self.available(karat).await?,
            });
        }

        Ok(buckets)
    }

    /// Credits weight into a bucket, creating the row on first use.
    pub async fn credit(
        &self,
        conn: &mut SqliteConnection,
        karat: Karat,
        weight: Weight,
    ) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO scrap_inventory (karat, weight_mg) VALUES (?1, ?2)
             ON CONFLICT(karat) DO UPDATE SET weight_mg = weight_mg + excluded.weight_mg",
        )
        .bind(karat)
        .bind(weight)
        .execute(&mut *conn)
        .await?;

        debug!(karat = %karat, weight = %weight, "Scrap credited");
        Ok(())
    }

    /// Conditionally debits weight from a bucket.
    ///
    /// The availability check and the subtraction are a single UPDATE; see
    /// the module docs. On `Insufficient`, the ledger is untouched and the
    /// observed balance is carried back for the operator message.
    pub async fn try_debit(
        &self,
        conn: &mut SqliteConnection,
        karat: Karat,
        weight: Weight,
    ) -> DbResult<DebitOutcome> {
        let result = sqlx::query(
            "UPDATE scrap_inventory SET weight_mg = weight_mg - ?2 \
             WHERE karat = ?1 AND weight_mg >= ?2",
        )
        .bind(karat)
        .bind(weight)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            let available = self.available_on(conn, karat).await?;
            debug!(karat = %karat, requested = %weight, available = %available, "Debit refused");
            return Ok(DebitOutcome::Insufficient { available });
        }

        debug!(karat = %karat, weight = %weight, "Scrap debited");
        Ok(DebitOutcome::Applied)
    }

    // =========================================================================
    // Old-Gold Purchases
    // =========================================================================

    /// Records an old-gold purchase inside the caller's transaction.
    ///
    /// `sale_id` is set when the purchase is a trade-in credited during a
    /// checkout, NULL for a direct cash buy.
    pub async fn insert_purchase(
        &self,
        conn: &mut SqliteConnection,
        purchase: &OldGoldPurchase,
    ) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO old_gold_purchases (
                id, transaction_date, karat, weight_mg, buy_rate, total_value,
                sale_id, customer_national_id, customer_phone, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&purchase.id)
        .bind(purchase.transaction_date)
        .bind(purchase.karat)
        .bind(purchase.weight)
        .bind(purchase.buy_rate)
        .bind(purchase.total_value)
        .bind(&purchase.sale_id)
        .bind(&purchase.customer_national_id)
        .bind(&purchase.customer_phone)
        .bind(&purchase.description)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Lists old-gold purchases, newest first.
    pub async fn list_purchases(&self, limit: u32) -> DbResult<Vec<OldGoldPurchase>> {
        let sql = format!(
            "SELECT {PURCHASE_COLUMNS} FROM old_gold_purchases \
             ORDER BY transaction_date DESC LIMIT ?1"
        );
        let purchases = sqlx::query_as::<_, OldGoldPurchase>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(purchases)
    }

    // =========================================================================
    // Purifications
    // =========================================================================

    /// Records a purification dispatch inside the caller's transaction.
    pub async fn insert_purification(
        &self,
        conn: &mut SqliteConnection,
        purification: &PurificationTransaction,
    ) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO scrap_purifications (
                id, transaction_date, karat, weight_out_mg, cash_received, factory_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&purification.id)
        .bind(purification.transaction_date)
        .bind(purification.karat)
        .bind(purification.weight_out)
        .bind(purification.cash_received)
        .bind(&purification.factory_name)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Lists purification dispatches, newest first.
    pub async fn list_purifications(&self, limit: u32) -> DbResult<Vec<PurificationTransaction>> {
        let sql = format!(
            "SELECT {PURIFICATION_COLUMNS} FROM scrap_purifications \
             ORDER BY transaction_date DESC LIMIT ?1"
        );
        let purifications = sqlx::query_as::<_, PurificationTransaction>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(purifications)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn credited(db: &Database, karat: Karat, grams: i64) {
        let repo = db.scrap();
        let mut tx = db.pool().begin().await.unwrap();
        repo.credit(&mut tx, karat, Weight::from_grams(grams))
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn empty_ledger_reads_zero_everywhere() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.scrap();

        assert_eq!(repo.available(Karat::K21).await.unwrap(), Weight::zero());

        let buckets = repo.buckets().await.unwrap();
        assert_eq!(buckets.len(), 3);
        assert!(buckets.iter().all(|b| b.available.is_zero()));
    }

    #[tokio::test]
    async fn credit_accumulates_per_bucket() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.scrap();

        credited(&db, Karat::K21, 5).await;
        credited(&db, Karat::K21, 3).await;
        credited(&db, Karat::K18, 2).await;

        assert_eq!(
            repo.available(Karat::K21).await.unwrap(),
            Weight::from_grams(8)
        );
        assert_eq!(
            repo.available(Karat::K18).await.unwrap(),
            Weight::from_grams(2)
        );
        assert_eq!(repo.available(Karat::K24).await.unwrap(), Weight::zero());
    }

    #[tokio::test]
    async fn debit_of_exact_balance_succeeds() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.scrap();
        credited(&db, Karat::K21, 10).await;

        let mut tx = db.pool().begin().await.unwrap();
        let outcome = repo
            .try_debit(&mut tx, Karat::K21, Weight::from_grams(10))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(outcome, DebitOutcome::Applied);
        assert_eq!(repo.available(Karat::K21).await.unwrap(), Weight::zero());
    }

    #[tokio::test]
    async fn debit_over_balance_is_refused_and_reports_available() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.scrap();
        credited(&db, Karat::K21, 10).await;

        // One milligram over the balance.
        let mut tx = db.pool().begin().await.unwrap();
        let outcome = repo
            .try_debit(&mut tx, Karat::K21, Weight::from_milligrams(10_001))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(
            outcome,
            DebitOutcome::Insufficient {
                available: Weight::from_grams(10)
            }
        );
        // Ledger untouched.
        assert_eq!(
            repo.available(Karat::K21).await.unwrap(),
            Weight::from_grams(10)
        );
    }

    #[tokio::test]
    async fn debit_from_missing_bucket_reports_zero() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.scrap();

        let mut tx = db.pool().begin().await.unwrap();
        let outcome = repo
            .try_debit(&mut tx, Karat::K24, Weight::from_grams(1))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(
            outcome,
            DebitOutcome::Insufficient {
                available: Weight::zero()
            }
        );
    }

    #[tokio::test]
    async fn schema_rejects_negative_balance() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        credited(&db, Karat::K21, 1).await;

        // Bypass the conditional guard on purpose.
        let result = sqlx::query(
            "UPDATE scrap_inventory SET weight_mg = weight_mg - 5000 WHERE karat = 'KARAT_21'",
        )
        .execute(db.pool())
        .await;

        assert!(result.is_err());
    }
}
