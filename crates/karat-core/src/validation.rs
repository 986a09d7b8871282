//! # Validation Module
//!
//! Business rule validation for operator-entered data.
//!
//! ## Validation Strategy
//! Validation runs in layers: the form layer gives immediate feedback, this
//! module is the authoritative check before anything reaches the database,
//! and the schema's constraints are the last line of defence. Each layer
//! catches errors the one above missed.

use crate::error::ValidationError;
use crate::money::{Money, Weight};
use crate::types::TradeInItem;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// National id length mandated for old-gold purchases.
pub const NATIONAL_ID_LEN: usize = 14;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the customer national id: exactly 14 ASCII digits.
///
/// ```rust
/// use karat_core::validation::validate_national_id;
///
/// assert!(validate_national_id("29801011234567").is_ok());
/// assert!(validate_national_id("123").is_err());
/// assert!(validate_national_id("2980101123456X").is_err());
/// ```
pub fn validate_national_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "customerNationalId",
        });
    }

    if id.len() != NATIONAL_ID_LEN || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "customerNationalId",
            reason: "must be exactly 14 digits",
        });
    }

    Ok(())
}

/// Validates an optional phone number: 10-15 digits when present.
pub fn validate_phone(phone: Option<&str>) -> ValidationResult<()> {
    let Some(phone) = phone else {
        return Ok(());
    };
    let phone = phone.trim();

    if phone.is_empty() {
        return Ok(());
    }

    if !(10..=15).contains(&phone.len()) || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "customerPhone",
            reason: "must be 10 to 15 digits",
        });
    }

    Ok(())
}

/// Validates a customer name: non-blank, at most 100 characters.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customerName",
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "customerName",
            max: 100,
        });
    }

    Ok(())
}

/// Validates a factory/refinery name for purification auditing.
pub fn validate_factory_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "factoryName",
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a weight field: strictly positive.
pub fn validate_weight(field: &'static str, weight: Weight) -> ValidationResult<()> {
    if !weight.is_positive() {
        return Err(ValidationError::MustBePositive { field });
    }

    Ok(())
}

/// Validates a money field: strictly positive.
pub fn validate_amount(field: &'static str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive { field });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a full trade-in capture before it may enter a cart or be
/// submitted as a direct cash purchase.
///
/// Fields are checked in a fixed order and the first offender is reported,
/// matching the capture dialog's focus behavior.
pub fn validate_trade_in(item: &TradeInItem) -> ValidationResult<()> {
    validate_weight("weight", item.weight)?;
    validate_amount("buyRate", item.buy_rate)?;
    validate_national_id(&item.customer_national_id)?;
    validate_phone(item.customer_phone.as_deref())?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Karat;

    fn trade_in() -> TradeInItem {
        TradeInItem {
            karat: Karat::K21,
            weight: Weight::from_grams(5),
            buy_rate: Money::from_minor(290_000),
            customer_national_id: "29801011234567".to_string(),
            customer_phone: Some("01001234567".to_string()),
            description: None,
        }
    }

    #[test]
    fn national_id() {
        assert!(validate_national_id("29801011234567").is_ok());
        assert!(validate_national_id("").is_err());
        assert!(validate_national_id("   ").is_err());
        assert!(validate_national_id("1234567890123").is_err()); // 13 digits
        assert!(validate_national_id("123456789012345").is_err()); // 15 digits
        assert!(validate_national_id("2980101123456X").is_err());
    }

    #[test]
    fn phone_is_optional() {
        assert!(validate_phone(None).is_ok());
        assert!(validate_phone(Some("")).is_ok());
        assert!(validate_phone(Some("01001234567")).is_ok());
        assert!(validate_phone(Some("123")).is_err());
        assert!(validate_phone(Some("not-a-phone")).is_err());
    }

    #[test]
    fn customer_name() {
        assert!(validate_customer_name("Mona Hassan").is_ok());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"x".repeat(200)).is_err());
    }

    #[test]
    fn trade_in_happy_path() {
        assert!(validate_trade_in(&trade_in()).is_ok());
    }

    #[test]
    fn trade_in_reports_first_offending_field() {
        let mut item = trade_in();
        item.weight = Weight::zero();
        item.buy_rate = Money::zero();

        // Weight is checked before buy rate.
        assert_eq!(
            validate_trade_in(&item),
            Err(ValidationError::MustBePositive { field: "weight" })
        );
    }

    #[test]
    fn trade_in_rejects_bad_rate() {
        let mut item = trade_in();
        item.buy_rate = Money::from_minor(-1);
        assert_eq!(
            validate_trade_in(&item),
            Err(ValidationError::MustBePositive { field: "buyRate" })
        );
    }
}
