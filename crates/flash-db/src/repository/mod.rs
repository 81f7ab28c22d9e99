//! # Repository Module
//!
//! SQLite repositories for Flash Inventory.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LedgerStore for Database                                              │
//! │       │                                                                 │
//! │       │  db.products().search("widget")                                │
//! │       │  db.sales().apply(&sale)                                       │
//! │       ▼                                                                 │
//! │  ProductRepository                 SaleRepository                      │
//! │  ├── insert / update / soft_delete ├── apply (atomic)                  │
//! │  ├── get_by_id / get_by_sku        ├── entries / for_product           │
//! │  └── search / low_stock            └── all                             │
//! │       │                                  │                              │
//! │       └──────────────┬───────────────────┘                              │
//! │                      ▼                                                  │
//! │                SQLite Database                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and search
//! - [`sale::SaleRepository`] - Sale transaction and sale log queries

pub mod product;
pub mod sale;
