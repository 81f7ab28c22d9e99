//! # flash-core: Pure Business Logic for Flash Inventory
//!
//! This crate is the **heart** of Flash Inventory. It holds the domain types,
//! validation rules and report math as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Flash Inventory Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api)                          │   │
//! │  │    /products ──► /sales ──► /reports ──► /dashboard            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ flash-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  report   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ SalesRep. │  │   rules   │  │   │
//! │  │   │   Sale    │  │           │  │ DailySales│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    flash-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, atomic sale transaction      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, ProductUpdate, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`report`] - Sales report and daily breakdown aggregation
//!
//! ## Example Usage
//!
//! ```rust
//! use flash_core::money::Money;
//!
//! let price = Money::from_cents(999); // $9.99
//! let total = price.multiply_quantity(3);
//!
//! assert_eq!(total.cents(), 2997);
//! assert_eq!(total.to_string(), "$29.97");
//! ```

pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{DailySales, DashboardSummary, SalesReport};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum stock level assigned to new products when the caller gives none.
///
/// A product is "low stock" when `stock_quantity < min_stock_level`.
pub const DEFAULT_MIN_STOCK_LEVEL: i64 = 5;

/// Category assigned to new products when the caller gives none.
pub const DEFAULT_CATEGORY: &str = "General";

/// Default period for the sales report, in days.
pub const DEFAULT_REPORT_DAYS: i64 = 30;

/// Default number of days in the daily breakdown.
pub const DEFAULT_DAILY_DAYS: usize = 7;

/// Default number of rows returned by "recent sales".
pub const DEFAULT_RECENT_SALES: u32 = 10;

/// Window used by the dashboard summary, in days.
pub const DASHBOARD_WINDOW_DAYS: i64 = 7;

/// Largest unit price accepted, in cents ($10,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Largest stock level or sale quantity accepted.
///
/// `MAX_PRICE_CENTS * MAX_QUANTITY` stays well inside `i64`, so a single
/// sale total can never overflow.
pub const MAX_QUANTITY: i64 = 1_000_000_000;
