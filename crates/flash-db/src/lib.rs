//! # flash-db: Database Layer for Flash Inventory
//!
//! Persistence for the product catalog and sale log, on SQLite via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Flash Inventory Data Flow                           │
//! │                                                                         │
//! │  HTTP handler (POST /sales)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SalesService ──► Arc<dyn LedgerStore>                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     flash-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ ProductRepo   │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │◄───│ SaleRepo      │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   LedgerStore trait ── Database | InMemoryStore                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL)                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQL for products and sales
//! - [`store`] - The `LedgerStore` seam used by the services
//! - [`memory`] - In-memory `LedgerStore` for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flash_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./flash.db")).await?;
//! let products = db.products().search("widget").await?;
//! ```

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use memory::InMemoryStore;
pub use pool::{Database, DbConfig};
pub use store::{LedgerStore, SaleOutcome};

pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
