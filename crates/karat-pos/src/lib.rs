//! # karat-pos: Sale Orchestration for Karat POS
//!
//! The service layer of the jewelry POS. Ties the pure logic of
//! [`karat_core`] to the SQLite persistence of [`karat_db`] and owns every
//! multi-table transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   ★ karat-pos (THIS CRATE) ★                           │
//! │                                                                         │
//! │  CheckoutService        OldGoldService         GoldRateService          │
//! │  scan / preview         buy_cash               publish                  │
//! │  submit_sale            purify                 current / sheet          │
//! │  void_sale              scrap_inventory        checkout_rate            │
//! │  get / list sales       list purchases                                  │
//! └───────────┬─────────────────────────────────────────────┬───────────────┘
//! │           │                                             │
//! ┌───────────▼───────────────┐                 ┌───────────▼───────────────┐
//! │        karat-core         │                 │         karat-db          │
//! │  cart, settlement, money  │                 │  pool, repositories,      │
//! │  validation, types        │                 │  atomic scrap guard       │
//! └───────────────────────────┘                 └───────────────────────────┘
//! ```
//!
//! ## Transaction Ownership
//! Services begin transactions on the shared pool and pass the connection
//! into repository write methods. A submission either commits every effect
//! (pieces sold, sale rows, trade-in purchases, scrap credits) or none.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod old_gold;
pub mod rates;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutService, CustomerInfo, SaleDetail};
pub use error::{PosError, PosResult};
pub use old_gold::{OldGoldService, PurificationRequest};
pub use rates::GoldRateService;
