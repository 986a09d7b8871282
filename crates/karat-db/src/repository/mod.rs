//! # Repository Module
//!
//! Database repository implementations for the POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (karat-pos)                                                    │
//! │       │                                                                 │
//! │       │  db.products().get_by_barcode("BC-1001")                        │
//! │       ▼                                                                 │
//! │  ProductRepository / SaleRepository / ScrapRepository / ...             │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transaction Ownership
//! Plain reads take `&self` and run on the pool. Writes that must compose
//! into a larger atomic unit take `&mut SqliteConnection` instead, so the
//! service layer owns the transaction:
//!
//! ```rust,ignore
//! let mut tx = db.pool().begin().await?;
//! db.sales().insert_sale(&mut tx, &sale).await?;
//! db.scrap().credit(&mut tx, karat, weight).await?;
//! tx.commit().await?;
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product lookup and status transitions
//! - [`sale::SaleRepository`] - Sale and sale item persistence, voiding
//! - [`scrap::ScrapRepository`] - Scrap ledger, old-gold purchases, purifications
//! - [`rate::GoldRateRepository`] - Daily buy/sell rates per karat

pub mod product;
pub mod rate;
pub mod sale;
pub mod scrap;
