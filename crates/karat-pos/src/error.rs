//! # Service Error Types
//!
//! Business-level errors surfaced to the terminal operator.
//!
//! ## Error Flow
//! ```text
//! ValidationError / CoreError (karat-core)
//!       │                          DbError (karat-db)
//!       │                             │
//!       └──────────► PosError ◄───────┘
//!                        │
//!                        ▼
//!          operator sees the message, decides, retries explicitly
//! ```
//!
//! Nothing here is retried automatically. A `Conflict` in particular means
//! the physical piece went to another terminal; retrying the same cart would
//! sell goods the shop no longer has.

use thiserror::Error;

use karat_core::{CoreError, Karat, ValidationError, Weight};
use karat_db::DbError;

/// Errors produced by the POS service layer.
#[derive(Debug, Error)]
pub enum PosError {
    /// Submission attempted with no scanned items.
    #[error("cannot submit a sale with an empty cart")]
    EmptyCart,

    /// Submission attempted without a customer name.
    #[error("customer name is required to submit a sale")]
    MissingCustomer,

    /// No usable gold rate published for the reference karat.
    #[error("no gold rate available; publish today's rates before selling")]
    RateUnavailable,

    /// A cart barcode no longer resolves to a product.
    #[error("product {barcode} not found")]
    ProductNotFound { barcode: String },

    /// Another terminal sold the piece between scan and submission.
    /// The whole submission was rolled back.
    #[error("item {barcode} was just sold on another terminal")]
    Conflict { barcode: String },

    /// Sale lookup or void target does not exist.
    #[error("sale {id} not found")]
    SaleNotFound { id: String },

    /// Void attempted on a sale that is already voided.
    #[error("sale {id} is already voided")]
    SaleAlreadyVoided { id: String },

    /// Purification asked for more scrap than the ledger holds.
    /// `available` is the balance the atomic guard observed.
    #[error("insufficient {karat} scrap: only {available} available")]
    InsufficientScrap { karat: Karat, available: Weight },

    /// Field-level input error, recoverable by correction.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Cart/business rule violation from karat-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type for POS service operations.
pub type PosResult<T> = Result<T, PosError>;
