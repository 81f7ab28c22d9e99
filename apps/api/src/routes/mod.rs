//! # HTTP Routes
//!
//! ```text
//! GET    /                          service banner
//! GET    /health                    storage health check
//! POST   /products                  create product
//! GET    /products?search=term      catalog / search
//! GET    /products/low-stock        products below their minimum
//! GET    /products/sku/{sku}        look up by SKU
//! GET    /products/{id}             look up by id
//! PUT    /products/{id}             partial update
//! PUT    /products/{id}/stock       set stock (?new_stock=N)
//! DELETE /products/{id}             soft delete
//! GET    /products/{id}/sales       a product's sales
//! POST   /sales                     apply a sale
//! GET    /sales?limit=N             sale log (newest first)
//! GET    /reports/sales?days=N      sales report
//! GET    /reports/daily?days=N      daily breakdown
//! GET    /dashboard                 dashboard summary
//! ```

use axum::Router;
use std::sync::Arc;

use crate::services::{InventoryService, ReportService, SalesService};
use flash_db::LedgerStore;

pub mod products;
pub mod reports;
pub mod sales;
pub mod system;

/// Shared handler state. Cloned per request; everything inside is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    pub sales: SalesService,
    pub reports: ReportService,
    pub store: Arc<dyn LedgerStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        AppState {
            inventory: InventoryService::new(Arc::clone(&store)),
            sales: SalesService::new(Arc::clone(&store)),
            reports: ReportService::new(Arc::clone(&store)),
            store,
        }
    }
}

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(system::router())
        .nest("/products", products::router())
        .nest("/sales", sales::router())
        .merge(reports::router())
        .with_state(state)
}
