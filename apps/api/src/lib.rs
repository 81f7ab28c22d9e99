//! # Flash Inventory API
//!
//! HTTP front end for the inventory ledger.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Flash Inventory API                              │
//! │                                                                         │
//! │  HTTP ──► routes (axum) ──► services ──► Arc<dyn LedgerStore>          │
//! │              │                 │                 │                      │
//! │              ▼                 ▼                 ▼                      │
//! │            dto            flash-core      flash-db (SQLite)             │
//! │        (wire shapes)   (validation,     or InMemoryStore                │
//! │                          reports)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is built once by the binary and handed to [`routes::AppState`];
//! tests build the same router over an in-memory database.

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;

pub use crate::config::{ApiConfig, ConfigError};
pub use crate::error::{ApiError, ErrorCode};
pub use crate::routes::{build_router, AppState};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set
/// - Otherwise: `info` globally, `debug` for flash crates, `warn` for sqlx
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flash=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
