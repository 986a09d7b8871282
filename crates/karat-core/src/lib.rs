//! # karat-core: Pure Business Logic for Karat POS
//!
//! This crate is the heart of the jewelry POS. It contains the sale-assembly
//! and settlement logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  karat-pos (orchestration)                  │
//! │      CheckoutService · OldGoldService · GoldRateService     │
//! └───────────────┬─────────────────────────────┬───────────────┘
//!                 │                             │
//! ┌───────────────▼───────────────┐ ┌───────────▼───────────────┐
//! │   ★ karat-core (THIS CRATE) ★ │ │         karat-db          │
//! │                               │ │                           │
//! │  money   cart   settlement    │ │  SQLite ledger of record  │
//! │  types   validation  error    │ │  products · sales · scrap │
//! │                               │ │                           │
//! │  NO I/O · PURE FUNCTIONS      │ │  the atomic scrap guard   │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Fixed-point `Money` (minor units) and `Weight` (milligrams)
//! - [`types`] - Domain types (Product, Sale, TradeInItem, ScrapBucket, ...)
//! - [`cart`] - Session-scoped cart with the no-duplicate-scan policy
//! - [`settlement`] - Pure subtotal / trade-in / net / change math
//! - [`validation`] - Business rule validation (national id, weights, rates)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same cart in, same settlement out, every time
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Arithmetic**: money in minor units, weight in milligrams
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod settlement;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use error::{CoreError, ValidationError};
pub use money::{Money, Weight};
pub use settlement::Settlement;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The purity whose rate is bound into a sale at checkout.
///
/// Most stock trades on the 21k rate in this market; the rate provider still
/// quotes every karat, and per-line pricing uses the bound rate uniformly.
pub const REFERENCE_KARAT: Karat = Karat::K21;
