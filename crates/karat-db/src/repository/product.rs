//! # Product Repository
//!
//! Database operations for unique jewelry pieces.
//!
//! ## Unique Inventory
//! Every row is one physical piece. There is no stock count; the `status`
//! column is the inventory:
//!
//! ```text
//! AVAILABLE ──(checkout, conditional update)──► SOLD
//!     ▲                                           │
//!     └───────────(void sale)────────────────────┘
//! ```
//!
//! The AVAILABLE → SOLD transition is a conditional UPDATE. When two
//! terminals race for the same piece, exactly one update matches and the
//! other sees zero affected rows.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use karat_core::{Product, ProductStatus};

const PRODUCT_COLUMNS: &str = "id, barcode, model_name, karat, jewelry_type, gross_weight_mg, \
     making_charge, estimated_price, cost_price, status, description, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Barcode scan at the terminal
/// let product = repo.get_by_barcode("BC-1001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Looks up a product by barcode. This is the scan path.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        debug!(barcode = %barcode, "Looking up product by barcode");

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Looks up a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists available (unsold) products, newest first.
    pub async fn list_available(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE status = 'AVAILABLE' ORDER BY created_at DESC LIMIT ?1"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the barcode already exists.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO products (
                id, barcode, model_name, karat, jewelry_type, gross_weight_mg,
                making_charge, estimated_price, cost_price, status, description,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.model_name)
        .bind(product.karat)
        .bind(product.jewelry_type)
        .bind(product.gross_weight)
        .bind(product.making_charge)
        .bind(product.estimated_price)
        .bind(product.cost_price)
        .bind(product.status)
        .bind(&product.description)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(barcode = %product.barcode, "Product inserted");
        Ok(())
    }

    /// Atomically transitions a product from AVAILABLE to SOLD.
    ///
    /// Takes a connection so the transition joins the checkout transaction.
    ///
    /// ## Returns
    /// * `true` - this call won the piece
    /// * `false` - the piece was not AVAILABLE (sold by a concurrent
    ///   checkout, or already gone); the caller must abort
    pub async fn mark_sold(&self, conn: &mut SqliteConnection, product_id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE products SET status = ?1, updated_at = ?2 \
             WHERE id = ?3 AND status = 'AVAILABLE'",
        )
        .bind(ProductStatus::Sold)
        .bind(Utc::now())
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns every product of a sale to AVAILABLE.
    ///
    /// Part of the void-sale transaction. Returns the number of pieces
    /// restored.
    pub async fn restore_for_sale(
        &self,
        conn: &mut SqliteConnection,
        sale_id: &str,
    ) -> DbResult<u64> {
        let result = sqlx::query(
            "UPDATE products SET status = ?1, updated_at = ?2 \
             WHERE id IN (SELECT product_id FROM sale_items WHERE sale_id = ?3)",
        )
        .bind(ProductStatus::Available)
        .bind(Utc::now())
        .bind(sale_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Total number of products. Used by the seed binary to avoid reseeding.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use karat_core::{JewelryType, Karat, Money, Weight};

    fn ring(id: &str) -> Product {
        Product {
            id: id.to_string(),
            barcode: format!("BC-{}", id),
            model_name: "Twist Ring".to_string(),
            karat: Karat::K21,
            jewelry_type: JewelryType::Ring,
            gross_weight: Weight::from_grams(8),
            making_charge: Money::from_minor(50_000),
            estimated_price: Money::from_minor(3_000_000),
            cost_price: Money::from_minor(2_500_000),
            status: ProductStatus::Available,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_lookup_by_barcode() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&ring("p1")).await.unwrap();

        let found = repo.get_by_barcode("BC-p1").await.unwrap().unwrap();
        assert_eq!(found.id, "p1");
        assert_eq!(found.karat, Karat::K21);
        assert_eq!(found.gross_weight, Weight::from_grams(8));
        assert_eq!(found.status, ProductStatus::Available);

        assert!(repo.get_by_barcode("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_barcode_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&ring("p1")).await.unwrap();

        let mut clone = ring("p2");
        clone.barcode = "BC-p1".to_string();
        assert!(matches!(
            repo.insert(&clone).await,
            Err(crate::error::DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn mark_sold_is_conditional() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        repo.insert(&ring("p1")).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert!(repo.mark_sold(&mut tx, "p1").await.unwrap());
        // Second transition loses: the piece is no longer AVAILABLE.
        assert!(!repo.mark_sold(&mut tx, "p1").await.unwrap());
        tx.commit().await.unwrap();

        let sold = repo.get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(sold.status, ProductStatus::Sold);
    }
}
