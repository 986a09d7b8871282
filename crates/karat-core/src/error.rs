//! # Error Types
//!
//! Domain-specific error types for karat-core.
//!
//! ## Error Flow
//! ```text
//! ValidationError  - malformed input, field-level, user corrects and retries
//!       │
//!       ▼
//! CoreError        - cart/business rule violations
//!       │
//!       ▼
//! PosError (karat-pos) - adds precondition and ledger failures, surfaced
//!                        to the operator; nothing is retried silently
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, never manual impls
//! 2. Errors carry context (barcode, field name, available weight)
//! 3. Enum variants, never strings - callers match exhaustively

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and business rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A cart line with the same product already exists.
    ///
    /// Each piece is unique physical inventory, so a second scan of the same
    /// barcode is always an operator mistake, never a quantity increment.
    #[error("item {barcode} is already in the cart")]
    DuplicateItem { barcode: String },

    /// Removal target is not in the cart.
    #[error("product {product_id} is not in the cart")]
    ItemNotInCart { product_id: String },

    /// Trade-in removal target is not in the cart.
    #[error("no trade-in at position {index}")]
    TradeInNotInCart { index: usize },

    /// The scanned piece is not available for sale (already sold).
    #[error("item {barcode} is not available for sale")]
    ProductNotAvailable { barcode: String },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Field-level, recoverable by user correction. The `field` is the offending
/// field's wire name so the UI can highlight it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Invalid format (e.g., national id not 14 digits).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = CoreError::DuplicateItem {
            barcode: "RING-001".to_string(),
        };
        assert_eq!(err.to_string(), "item RING-001 is already in the cart");

        let err = ValidationError::Required {
            field: "customerNationalId",
        };
        assert_eq!(err.to_string(), "customerNationalId is required");
    }

    #[test]
    fn validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive { field: "weight" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
