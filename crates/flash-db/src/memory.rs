//! In-memory [`LedgerStore`].
//!
//! Intended for tests and demos. A single mutex guards products and sales
//! together, which makes `apply_sale` trivially atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::{DbError, DbResult};
use crate::store::{LedgerStore, SaleOutcome};
use flash_core::{AppliedSale, Product, ProductUpdate, Sale, SaleEntry};

#[derive(Debug, Default)]
struct Ledger {
    products: Vec<Product>,
    /// Insertion order; doubles as the tiebreak for equal sale dates.
    sales: Vec<Sale>,
}

impl Ledger {
    fn active(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id && p.is_active)
    }

    fn active_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id && p.is_active)
    }

    fn entry(&self, sale: &Sale) -> SaleEntry {
        let product = self.products.iter().find(|p| p.id == sale.product_id);
        SaleEntry {
            sale: sale.clone(),
            product_name: product.map(|p| p.name.clone()),
            product_sku: product.map(|p| p.sku.clone()),
        }
    }

    fn newest_first<'a>(&'a self, sales: impl Iterator<Item = &'a Sale>) -> Vec<SaleEntry> {
        let mut indexed: Vec<(usize, &Sale)> = sales.enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| b.sale_date.cmp(&a.sale_date).then(ib.cmp(ia)));
        indexed.into_iter().map(|(_, s)| self.entry(s)).collect()
    }
}

/// A [`LedgerStore`] that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    ledger: Mutex<Ledger>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_name(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.sku.cmp(&b.sku)));
    products
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn insert_product(&self, product: &Product) -> DbResult<()> {
        let mut ledger = self.ledger.lock().await;

        // Mirrors UNIQUE(sku), which also covers inactive rows
        if ledger.products.iter().any(|p| p.sku == product.sku) {
            return Err(DbError::duplicate("products.sku", &product.sku));
        }
        if ledger.products.iter().any(|p| p.id == product.id) {
            return Err(DbError::duplicate("products.id", &product.id));
        }

        ledger.products.push(product.clone());
        Ok(())
    }

    async fn list_products(&self) -> DbResult<Vec<Product>> {
        let ledger = self.ledger.lock().await;
        let active = ledger.products.iter().filter(|p| p.is_active).cloned().collect();
        Ok(sorted_by_name(active))
    }

    async fn search_products(&self, term: &str) -> DbResult<Vec<Product>> {
        let term = term.trim();
        let ledger = self.ledger.lock().await;
        let matches = ledger
            .products
            .iter()
            .filter(|p| p.is_active && p.matches_search(term))
            .cloned()
            .collect();
        Ok(sorted_by_name(matches))
    }

    async fn low_stock_products(&self) -> DbResult<Vec<Product>> {
        let ledger = self.ledger.lock().await;
        let mut low: Vec<Product> = ledger
            .products
            .iter()
            .filter(|p| p.is_active && p.is_low_stock())
            .cloned()
            .collect();
        low.sort_by(|a, b| {
            a.stock_quantity
                .cmp(&b.stock_quantity)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(low)
    }

    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        Ok(self.ledger.lock().await.active(id).cloned())
    }

    async fn product_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let ledger = self.ledger.lock().await;
        Ok(ledger
            .products
            .iter()
            .find(|p| p.sku == sku && p.is_active)
            .cloned())
    }

    async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
        now: DateTime<Utc>,
    ) -> DbResult<Product> {
        let mut ledger = self.ledger.lock().await;

        if let Some(sku) = &update.sku {
            if ledger.products.iter().any(|p| &p.sku == sku && p.id != id) {
                return Err(DbError::duplicate("products.sku", sku));
            }
        }

        let product = ledger
            .active_mut(id)
            .ok_or_else(|| DbError::not_found("Product", id))?;
        product.apply_update(update, now);
        Ok(product.clone())
    }

    async fn deactivate_product(&self, id: &str, now: DateTime<Utc>) -> DbResult<()> {
        let mut ledger = self.ledger.lock().await;
        let product = ledger
            .active_mut(id)
            .ok_or_else(|| DbError::not_found("Product", id))?;
        product.is_active = false;
        product.updated_at = now;
        Ok(())
    }

    async fn apply_sale(&self, sale: &Sale) -> DbResult<SaleOutcome> {
        let mut ledger = self.ledger.lock().await;

        let Some(product) = ledger.active_mut(&sale.product_id) else {
            return Ok(SaleOutcome::ProductMissing);
        };
        if !product.can_sell(sale.quantity_sold) {
            return Ok(SaleOutcome::InsufficientStock {
                available: product.stock_quantity,
            });
        }

        product.stock_quantity -= sale.quantity_sold;
        product.updated_at = sale.sale_date;
        let remaining_stock = product.stock_quantity;
        ledger.sales.push(sale.clone());

        Ok(SaleOutcome::Applied(AppliedSale {
            sale: sale.clone(),
            remaining_stock,
        }))
    }

    async fn all_sales(&self) -> DbResult<Vec<Sale>> {
        let ledger = self.ledger.lock().await;
        let mut sales = ledger.sales.clone();
        // Stable sort keeps insertion order for equal dates
        sales.sort_by_key(|s| s.sale_date);
        Ok(sales)
    }

    async fn sale_entries(&self, limit: Option<u32>) -> DbResult<Vec<SaleEntry>> {
        let ledger = self.ledger.lock().await;
        let mut entries = ledger.newest_first(ledger.sales.iter());
        if let Some(limit) = limit {
            entries.truncate(limit as usize);
        }
        Ok(entries)
    }

    async fn sales_for_product(&self, product_id: &str) -> DbResult<Vec<SaleEntry>> {
        let ledger = self.ledger.lock().await;
        Ok(ledger.newest_first(ledger.sales.iter().filter(|s| s.product_id == product_id)))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
