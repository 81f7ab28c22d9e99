//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD with soft delete
//! - Case-insensitive substring search on name or SKU
//! - Low-stock listing
//!
//! Every read filters on `is_active = 1`: a soft-deleted product is invisible
//! to the catalog but its row (and SKU) stays for historical sales.
//!
//! ## Partial Update
//! ```text
//! ProductUpdate { price: Some(1299), description: Some(None), .. }
//!      │
//!      ▼
//! UPDATE products SET
//!     price_cents = COALESCE(?4, price_cents),      ← Some → new value
//!     name        = COALESCE(?2, name),             ← None → unchanged
//!     description = CASE WHEN ?8 THEN ?9            ← Some(None) → NULL
//!                   ELSE description END
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use flash_core::{Product, ProductUpdate};

const PRODUCT_COLUMNS: &str = "id, name, sku, description, price_cents, stock_quantity, \
     min_stock_level, category, is_active, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let results = repo.search("widget").await?;
/// let product = repo.get_by_sku("W1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU already exists (even on a
    ///   soft-deleted product)
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sku, description,
                price_cents, stock_quantity, min_stock_level, category,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.min_stock_level)
        .bind(&product.category)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| with_sku(e.into(), Some(&product.sku)))?;

        Ok(())
    }

    /// Lists active products ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name, sku"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Searches active products by case-insensitive substring on name or SKU.
    ///
    /// A blank query returns the whole active catalog.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, "Searching products");

        if query.is_empty() {
            return self.list_active().await;
        }

        // instr() instead of LIKE: no wildcard escaping for '%' or '_' in the term
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE is_active = 1
              AND (instr(lower(name), lower(?1)) > 0 OR instr(lower(sku), lower(?1)) > 0)
            ORDER BY name, sku
            "#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(query)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Active products with `stock_quantity < min_stock_level`, lowest stock first.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE is_active = 1 AND stock_quantity < min_stock_level
            ORDER BY stock_quantity, name
            "#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets an active product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND is_active = 1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets an active product by its SKU (exact, case-sensitive match).
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1 AND is_active = 1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Applies a partial update and returns the updated product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No active product with this ID
    /// * `Err(DbError::UniqueViolation)` - New SKU already in use
    pub async fn update(
        &self,
        id: &str,
        update: &ProductUpdate,
        now: DateTime<Utc>,
    ) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let price_cents = update.price.map(|p| p.cents());
        let clear_or_set_description = update.description.is_some();
        let description = update.description.clone().flatten();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name            = COALESCE(?2, name),
                sku             = COALESCE(?3, sku),
                price_cents     = COALESCE(?4, price_cents),
                stock_quantity  = COALESCE(?5, stock_quantity),
                min_stock_level = COALESCE(?6, min_stock_level),
                category        = COALESCE(?7, category),
                description     = CASE WHEN ?8 THEN ?9 ELSE description END,
                updated_at      = ?10
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.sku)
        .bind(price_cents)
        .bind(update.stock_quantity)
        .bind(update.min_stock_level)
        .bind(&update.category)
        .bind(clear_or_set_description)
        .bind(description)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| with_sku(e.into(), update.sku.as_deref()))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Soft-deletes a product by setting is_active = 0.
    ///
    /// Historical sales keep pointing at the row, so the sales log still
    /// shows the product's name and SKU.
    pub async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = 0, updated_at = ?2
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Fills in the offending value on a UNIQUE violation, which SQLite omits.
pub(crate) fn with_sku(err: DbError, sku: Option<&str>) -> DbError {
    match (err, sku) {
        (DbError::UniqueViolation { field, .. }, Some(sku)) => DbError::duplicate(field, sku),
        (err, _) => err,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use flash_core::{Money, NewProduct};

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    fn product(name: &str, sku: &str, stock: i64) -> Product {
        Product::new(
            NewProduct::new(name, sku, Money::from_cents(999), stock),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let widget = product("Widget", "W1", 10);
        repo.insert(&widget).await.unwrap();

        let by_sku = repo.get_by_sku("W1").await.unwrap().unwrap();
        assert_eq!(by_sku.id, widget.id);
        assert_eq!(by_sku.name, "Widget");
        assert_eq!(by_sku.price_cents, 999);
        assert_eq!(by_sku.stock_quantity, 10);
        assert!(by_sku.is_active);

        let by_id = repo.get_by_id(&widget.id).await.unwrap().unwrap();
        assert_eq!(by_id.sku, "W1");

        assert!(repo.get_by_sku("w1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_unique_violation() {
        let repo = repo().await;
        repo.insert(&product("Widget", "W1", 10)).await.unwrap();

        let err = repo.insert(&product("Other", "W1", 1)).await.unwrap_err();
        assert!(err.is_duplicate_sku());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_matches_name_or_sku() {
        let repo = repo().await;
        repo.insert(&product("Blue Widget", "BW-1", 10)).await.unwrap();
        repo.insert(&product("Gadget", "GAD-100%", 10)).await.unwrap();

        assert_eq!(repo.search("widget").await.unwrap().len(), 1);
        assert_eq!(repo.search("gad-").await.unwrap().len(), 1);
        assert_eq!(repo.search("100%").await.unwrap().len(), 1);
        assert_eq!(repo.search("_").await.unwrap().len(), 0);
        assert_eq!(repo.search("  ").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_low_stock_is_strict() {
        let repo = repo().await;
        repo.insert(&product("At Min", "A", 5)).await.unwrap();
        repo.insert(&product("Below", "B", 4)).await.unwrap();

        let low = repo.low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].sku, "B");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = repo().await;
        let mut widget = product("Widget", "W1", 10);
        widget.description = Some("blue".to_string());
        repo.insert(&widget).await.unwrap();

        let update = ProductUpdate {
            price: Some(Money::from_cents(1299)),
            description: Some(None),
            ..Default::default()
        };
        let updated = repo.update(&widget.id, &update, Utc::now()).await.unwrap();

        assert_eq!(updated.price_cents, 1299);
        assert_eq!(updated.description, None);
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.stock_quantity, 10);

        let updated = repo
            .update(&widget.id, &ProductUpdate::stock(0), Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.stock_quantity, 0);
    }

    #[tokio::test]
    async fn test_update_sku_to_taken_sku() {
        let repo = repo().await;
        repo.insert(&product("Widget", "W1", 10)).await.unwrap();
        let gadget = product("Gadget", "G1", 10);
        repo.insert(&gadget).await.unwrap();

        let update = ProductUpdate {
            sku: Some("W1".to_string()),
            ..Default::default()
        };
        let err = repo.update(&gadget.id, &update, Utc::now()).await.unwrap_err();

        assert!(matches!(&err, DbError::UniqueViolation { value, .. } if value == "W1"));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let repo = repo().await;
        let err = repo
            .update("missing", &ProductUpdate::stock(1), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_product() {
        let repo = repo().await;
        let widget = product("Widget", "W1", 10);
        repo.insert(&widget).await.unwrap();

        repo.soft_delete(&widget.id, Utc::now()).await.unwrap();

        assert!(repo.get_by_id(&widget.id).await.unwrap().is_none());
        assert!(repo.list_active().await.unwrap().is_empty());
        assert!(matches!(
            repo.soft_delete(&widget.id, Utc::now()).await,
            Err(DbError::NotFound { .. })
        ));

        // SKU stays reserved
        let err = repo.insert(&product("Again", "W1", 1)).await.unwrap_err();
        assert!(err.is_duplicate_sku());
    }
}
