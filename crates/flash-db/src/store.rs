//! # Ledger Store
//!
//! The storage seam the services are written against.
//!
//! ```text
//!                    ┌──────────────────────────┐
//!   services ───────►│  Arc<dyn LedgerStore>    │
//!                    └────────────┬─────────────┘
//!                   ┌─────────────┴──────────────┐
//!                   ▼                            ▼
//!          Database (SQLite)             InMemoryStore
//!          production + db tests         service unit tests
//! ```
//!
//! Implementations must make [`LedgerStore::apply_sale`] atomic: the stock
//! decrement and the sale row are written together or not at all, and
//! concurrent calls for one product behave as if run one after another.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DbResult;
use crate::pool::Database;
use flash_core::{AppliedSale, Product, ProductUpdate, Sale, SaleEntry};

/// Result of an atomic sale attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SaleOutcome {
    /// Stock was decremented and the sale recorded.
    Applied(AppliedSale),

    /// Stock was short; nothing was written.
    InsufficientStock { available: i64 },

    /// No active product with the sale's `product_id`; nothing was written.
    ProductMissing,
}

/// Persistence operations for products and sales.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Inserts a product. A taken SKU is a `UniqueViolation`.
    async fn insert_product(&self, product: &Product) -> DbResult<()>;

    /// Active products ordered by name.
    async fn list_products(&self) -> DbResult<Vec<Product>>;

    /// Case-insensitive substring match on name or SKU.
    async fn search_products(&self, term: &str) -> DbResult<Vec<Product>>;

    async fn low_stock_products(&self) -> DbResult<Vec<Product>>;

    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>>;

    async fn product_by_sku(&self, sku: &str) -> DbResult<Option<Product>>;

    /// Applies a partial update. `NotFound` when no active product matches.
    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
        now: DateTime<Utc>,
    ) -> DbResult<Product>;

    /// Soft delete. `NotFound` when no active product matches.
    async fn deactivate_product(&self, id: &str, now: DateTime<Utc>) -> DbResult<()>;

    /// Conditional decrement plus sale insert, atomically.
    async fn apply_sale(&self, sale: &Sale) -> DbResult<SaleOutcome>;

    /// Every sale, oldest first.
    async fn all_sales(&self) -> DbResult<Vec<Sale>>;

    /// Sales joined with product name/SKU, newest first.
    async fn sale_entries(&self, limit: Option<u32>) -> DbResult<Vec<SaleEntry>>;

    async fn sales_for_product(&self, product_id: &str) -> DbResult<Vec<SaleEntry>>;

    async fn health_check(&self) -> bool;
}

#[async_trait]
impl LedgerStore for Database {
    async fn insert_product(&self, product: &Product) -> DbResult<()> {
        self.products().insert(product).await
    }

    async fn list_products(&self) -> DbResult<Vec<Product>> {
        self.products().list_active().await
    }

    async fn search_products(&self, term: &str) -> DbResult<Vec<Product>> {
        self.products().search(term).await
    }

    async fn low_stock_products(&self) -> DbResult<Vec<Product>> {
        self.products().low_stock().await
    }

    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        self.products().get_by_id(id).await
    }

    async fn product_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        self.products().get_by_sku(sku).await
    }

    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
        now: DateTime<Utc>,
    ) -> DbResult<Product> {
        self.products().update(id, update, now).await
    }

    async fn deactivate_product(&self, id: &str, now: DateTime<Utc>) -> DbResult<()> {
        self.products().soft_delete(id, now).await
    }

    async fn apply_sale(&self, sale: &Sale) -> DbResult<SaleOutcome> {
        self.sales().apply(sale).await
    }

    async fn all_sales(&self) -> DbResult<Vec<Sale>> {
        self.sales().all().await
    }

    async fn sale_entries(&self, limit: Option<u32>) -> DbResult<Vec<SaleEntry>> {
        self.sales().entries(limit).await
    }

    async fn sales_for_product(&self, product_id: &str) -> DbResult<Vec<SaleEntry>> {
        self.sales().for_product(product_id).await
    }

    async fn health_check(&self) -> bool {
        Database::health_check(self).await
    }
}
