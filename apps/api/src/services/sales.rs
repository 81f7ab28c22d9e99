//! # Sales Service
//!
//! The sale application protocol and the sale log views.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /sales { sku: "W1", quantity: 3 }                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. validate_quantity(3)                                               │
//! │  2. resolve product by id or SKU ─────────► ProductNotFound            │
//! │  3. resolve_sale_price(caller, listed) ───► ValidationError            │
//! │  4. store.apply_sale (one transaction)                                 │
//! │       ├── Applied { remaining_stock }  ──► SaleReceipt                 │
//! │       ├── InsufficientStock { available } ► InsufficientStock          │
//! │       └── ProductMissing (deleted meanwhile) ► ProductNotFound         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::ServiceResult;
use flash_core::validation::{resolve_sale_price, validate_quantity};
use flash_core::{CoreError, Product, ProductRef, Sale, SaleEntry, SaleRequest};
use flash_db::{LedgerStore, SaleOutcome};

/// A recorded sale plus the stock left afterwards.
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    pub sale: SaleEntry,
    pub remaining_stock: i64,
}

/// Sale recording and sale log service.
#[derive(Clone)]
pub struct SalesService {
    store: Arc<dyn LedgerStore>,
}

impl SalesService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        SalesService { store }
    }

    async fn resolve(&self, product: &ProductRef) -> ServiceResult<Product> {
        let found = match product {
            ProductRef::Id(id) => self.store.product_by_id(id.trim()).await?,
            ProductRef::Sku(sku) => self.store.product_by_sku(sku.trim()).await?,
        };
        found.ok_or_else(|| CoreError::ProductNotFound(product.to_string()).into())
    }

    /// Records a sale and decrements stock atomically.
    pub async fn apply_sale(&self, request: SaleRequest) -> ServiceResult<SaleReceipt> {
        validate_quantity(request.quantity)?;

        let product = self.resolve(&request.product).await?;
        let price = resolve_sale_price(request.sale_price, product.price())?;

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            quantity_sold: request.quantity,
            sale_price_cents: price.cents(),
            sale_date: request.sale_date.unwrap_or_else(Utc::now),
        };

        match self.store.apply_sale(&sale).await? {
            SaleOutcome::Applied(applied) => {
                info!(
                    sale_id = %applied.sale.id,
                    sku = %product.sku,
                    quantity = applied.sale.quantity_sold,
                    total = %applied.sale.total(),
                    remaining = applied.remaining_stock,
                    "Sale recorded"
                );
                Ok(SaleReceipt {
                    sale: SaleEntry {
                        sale: applied.sale,
                        product_name: Some(product.name),
                        product_sku: Some(product.sku),
                    },
                    remaining_stock: applied.remaining_stock,
                })
            }
            SaleOutcome::InsufficientStock { available } => {
                warn!(
                    sku = %product.sku,
                    available,
                    requested = request.quantity,
                    "Sale rejected: insufficient stock"
                );
                Err(CoreError::InsufficientStock {
                    sku: product.sku,
                    available,
                    requested: request.quantity,
                }
                .into())
            }
            SaleOutcome::ProductMissing => {
                warn!(product_id = %product.id, "Product disappeared before sale was applied");
                Err(CoreError::ProductNotFound(product.id).into())
            }
        }
    }

    /// Full sale log, newest first.
    pub async fn sales_log(&self) -> ServiceResult<Vec<SaleEntry>> {
        Ok(self.store.sale_entries(None).await?)
    }

    /// The `limit` newest sales.
    pub async fn recent_sales(&self, limit: u32) -> ServiceResult<Vec<SaleEntry>> {
        Ok(self.store.sale_entries(Some(limit)).await?)
    }

    /// A product's sales, newest first. Unknown ids yield an empty list.
    pub async fn sales_for_product(&self, product_id: &str) -> ServiceResult<Vec<SaleEntry>> {
        Ok(self.store.sales_for_product(product_id.trim()).await?)
    }
}
