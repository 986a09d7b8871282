//! # Sale Repository
//!
//! Persistence for completed sales and their line items.
//!
//! ## Write Shape
//! A sale is never written alone. The checkout transaction interleaves
//! repositories:
//!
//! ```text
//! BEGIN
//!   products.mark_sold(...)          per piece, conditional
//!   sales.insert_sale(...)
//!   sales.insert_item(...)           per piece, frozen snapshots
//!   scrap.insert_purchase(...)       per trade-in
//!   scrap.credit(...)                per trade-in
//! COMMIT
//! ```
//!
//! All write methods here take `&mut SqliteConnection` so the service layer
//! owns that transaction.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use karat_core::{Sale, SaleItem, SaleStatus};

const SALE_COLUMNS: &str = "id, customer_name, customer_phone, transaction_date, \
     applied_gold_rate, total_amount, old_gold_total, net_cash_paid, status";

const ITEM_COLUMNS: &str = "id, sale_id, product_id, model_name_snapshot, \
     applied_gold_rate, weight_snapshot_mg, price_snapshot, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts the sale header inside the checkout transaction.
    pub async fn insert_sale(&self, conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO sales (
                id, customer_name, customer_phone, transaction_date,
                applied_gold_rate, total_amount, old_gold_total, net_cash_paid, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&sale.id)
        .bind(&sale.customer_name)
        .bind(&sale.customer_phone)
        .bind(sale.transaction_date)
        .bind(sale.applied_gold_rate)
        .bind(sale.total_amount)
        .bind(sale.old_gold_total)
        .bind(sale.net_cash_paid)
        .bind(sale.status)
        .execute(&mut *conn)
        .await?;

        debug!(sale_id = %sale.id, "Sale header inserted");
        Ok(())
    }

    /// Inserts one line item inside the checkout transaction.
    ///
    /// The item carries frozen snapshots (name, weight, rate, price) so the
    /// record stays truthful if the product is edited later.
    pub async fn insert_item(&self, conn: &mut SqliteConnection, item: &SaleItem) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO sale_items (
                id, sale_id, product_id, model_name_snapshot,
                applied_gold_rate, weight_snapshot_mg, price_snapshot, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(&item.model_name_snapshot)
        .bind(item.applied_gold_rate)
        .bind(item.weight_snapshot)
        .bind(item.price_snapshot)
        .bind(item.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Fetches a sale header by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Fetches the line items of a sale, in insertion order.
    pub async fn items_for(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY created_at, id"
        );
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Lists recent sales, newest first. Includes voided sales; the status
    /// column tells them apart.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sql =
            format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY transaction_date DESC LIMIT ?1");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Atomically transitions a sale from COMPLETED to VOIDED.
    ///
    /// ## Returns
    /// * `true` - this call voided the sale
    /// * `false` - the sale was not COMPLETED (already voided, or the ID
    ///   doesn't exist); the caller decides which from a prior read
    pub async fn mark_voided(&self, conn: &mut SqliteConnection, sale_id: &str) -> DbResult<bool> {
        let result = sqlx::query("UPDATE sales SET status = ?1 WHERE id = ?2 AND status = ?3")
            .bind(SaleStatus::Voided)
            .bind(sale_id)
            .bind(SaleStatus::Completed)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use karat_core::Money;

    fn sale(id: &str) -> Sale {
        Sale {
            id: id.to_string(),
            customer_name: "Mona Hassan".to_string(),
            customer_phone: None,
            transaction_date: Utc::now(),
            applied_gold_rate: Money::from_minor(300_000),
            total_amount: Money::from_minor(2_500_000),
            old_gold_total: Money::zero(),
            net_cash_paid: Money::from_minor(2_500_000),
            status: SaleStatus::Completed,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_sale() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        let mut tx = db.pool().begin().await.unwrap();
        repo.insert_sale(&mut tx, &sale("s1")).await.unwrap();
        tx.commit().await.unwrap();

        let found = repo.get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(found.customer_name, "Mona Hassan");
        assert_eq!(found.status, SaleStatus::Completed);
        assert_eq!(found.net_cash_paid, Money::from_minor(2_500_000));

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mark_voided_is_conditional() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        let mut tx = db.pool().begin().await.unwrap();
        repo.insert_sale(&mut tx, &sale("s1")).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert!(repo.mark_voided(&mut tx, "s1").await.unwrap());
        assert!(!repo.mark_voided(&mut tx, "s1").await.unwrap());
        assert!(!repo.mark_voided(&mut tx, "missing").await.unwrap());
        tx.commit().await.unwrap();

        let voided = repo.get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(voided.status, SaleStatus::Voided);
    }
}
