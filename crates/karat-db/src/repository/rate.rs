//! # Gold Rate Repository
//!
//! Persistence for the daily buy/sell rates, one row per karat.
//!
//! Rates are replaced in place each morning; sales snapshot the rate they
//! used into their own rows, so no history table is needed here.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use karat_core::{GoldRate, Karat};

const RATE_COLUMNS: &str = "karat, buy_rate, sell_rate, updated_at";

/// Repository for gold rate operations.
#[derive(Debug, Clone)]
pub struct GoldRateRepository {
    pool: SqlitePool,
}

impl GoldRateRepository {
    /// Creates a new GoldRateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        GoldRateRepository { pool }
    }

    /// Inserts or replaces the rate row for one karat.
    pub async fn upsert(&self, rate: &GoldRate) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO gold_rates (karat, buy_rate, sell_rate, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(karat) DO UPDATE SET
                buy_rate = excluded.buy_rate,
                sell_rate = excluded.sell_rate,
                updated_at = excluded.updated_at",
        )
        .bind(rate.karat)
        .bind(rate.buy_rate)
        .bind(rate.sell_rate)
        .bind(rate.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(karat = %rate.karat, "Gold rate updated");
        Ok(())
    }

    /// Fetches the current rate for one karat, if ever published.
    pub async fn get(&self, karat: Karat) -> DbResult<Option<GoldRate>> {
        let sql = format!("SELECT {RATE_COLUMNS} FROM gold_rates WHERE karat = ?1");
        let rate = sqlx::query_as::<_, GoldRate>(&sql)
            .bind(karat)
            .fetch_optional(&self.pool)
            .await?;

        Ok(rate)
    }

    /// Fetches every published rate row.
    pub async fn list(&self) -> DbResult<Vec<GoldRate>> {
        let sql = format!("SELECT {RATE_COLUMNS} FROM gold_rates ORDER BY karat");
        let rates = sqlx::query_as::<_, GoldRate>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rates)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
