//! # Gold Rate Service
//!
//! Publishes and reads the daily buy/sell rate sheet.
//!
//! Rates are per gram, per karat, replaced in place each morning. Checkout
//! binds a copy of the rate it used into the sale, so replacing the sheet
//! never rewrites a past transaction.

use chrono::Utc;
use tracing::info;

use crate::error::PosResult;
use karat_core::{validation, GoldRate, Karat, Money, REFERENCE_KARAT};
use karat_db::Database;

/// Service for the daily rate sheet.
#[derive(Debug, Clone)]
pub struct GoldRateService {
    db: Database,
}

impl GoldRateService {
    /// Creates a new GoldRateService.
    pub fn new(db: Database) -> Self {
        GoldRateService { db }
    }

    /// Publishes today's rate for one karat, replacing any previous row.
    ///
    /// Both rates must be strictly positive.
    pub async fn publish(&self, karat: Karat, buy_rate: Money, sell_rate: Money) -> PosResult<GoldRate> {
        validation::validate_amount("buyRate", buy_rate)?;
        validation::validate_amount("sellRate", sell_rate)?;

        let rate = GoldRate {
            karat,
            buy_rate,
            sell_rate,
            updated_at: Utc::now(),
        };
        self.db.rates().upsert(&rate).await?;

        info!(karat = %karat, buy = %buy_rate, sell = %sell_rate, "Rate published");
        Ok(rate)
    }

    /// The current rate for one karat, if published.
    pub async fn current(&self, karat: Karat) -> PosResult<Option<GoldRate>> {
        Ok(self.db.rates().get(karat).await?)
    }

    /// The full published sheet.
    pub async fn sheet(&self) -> PosResult<Vec<GoldRate>> {
        Ok(self.db.rates().list().await?)
    }

    /// The rate a checkout would bind right now, if any.
    ///
    /// Sell rate of the reference karat, falling back to its buy rate.
    pub async fn checkout_rate(&self) -> PosResult<Option<Money>> {
        let rate = self.db.rates().get(REFERENCE_KARAT).await?;
        Ok(rate.and_then(|r| r.checkout_rate()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PosError;
    use karat_db::DbConfig;

    async fn service() -> GoldRateService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        GoldRateService::new(db)
    }

    #[tokio::test]
    async fn publish_and_read_back() {
        let rates = service().await;

        rates
            .publish(Karat::K21, Money::from_minor(290_000), Money::from_minor(300_000))
            .await
            .unwrap();

        let current = rates.current(Karat::K21).await.unwrap().unwrap();
        assert_eq!(current.sell_rate, Money::from_minor(300_000));

        assert_eq!(
            rates.checkout_rate().await.unwrap(),
            Some(Money::from_minor(300_000))
        );
    }

    #[tokio::test]
    async fn non_positive_rates_are_rejected() {
        let rates = service().await;

        let err = rates
            .publish(Karat::K21, Money::zero(), Money::from_minor(300_000))
            .await
            .unwrap_err();
        assert!(matches!(err, PosError::Validation(_)));

        assert!(rates.current(Karat::K21).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn checkout_rate_is_none_before_publishing() {
        let rates = service().await;
        assert_eq!(rates.checkout_rate().await.unwrap(), None);
    }
}
