//! # Sale Repository
//!
//! Database operations for the sale log, including the atomic sale
//! transaction.
//!
//! ## Sale Application
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  apply() - one SQLite transaction                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  UPDATE products                                                        │
//! │     SET stock_quantity = stock_quantity - :qty                          │
//! │   WHERE id = :id AND is_active = 1 AND stock_quantity >= :qty           │
//! │  RETURNING stock_quantity                                               │
//! │    │                                                                    │
//! │    ├── no row ──► SELECT stock_quantity (same tx)                       │
//! │    │                │                                                   │
//! │    │                ├── found   ──► ROLLBACK, InsufficientStock         │
//! │    │                └── missing ──► ROLLBACK, ProductMissing            │
//! │    │                                                                    │
//! │    ▼ row (remaining stock)                                              │
//! │  INSERT INTO sales (...)                                                │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT ──► Applied { sale, remaining_stock }                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional UPDATE is the transaction's first statement, so the
//! transaction takes SQLite's write lock before anything is read. Concurrent
//! sales queue on that lock (bounded by the busy timeout) and each one sees
//! the stock left by the previous commit.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::store::SaleOutcome;
use flash_core::{AppliedSale, Sale, SaleEntry};

const ENTRY_SELECT: &str = r#"
    SELECT
        s.id, s.product_id, s.quantity_sold, s.sale_price_cents, s.sale_date,
        p.name AS product_name,
        p.sku AS product_sku
    FROM sales s
    LEFT JOIN products p ON p.id = s.product_id
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Decrements stock and records `sale` as one atomic unit.
    ///
    /// Business rejections (short stock, missing product) come back as
    /// `Ok(SaleOutcome::..)` with nothing written; `Err` is reserved for
    /// storage failures.
    pub async fn apply(&self, sale: &Sale) -> DbResult<SaleOutcome> {
        debug!(
            product_id = %sale.product_id,
            quantity = sale.quantity_sold,
            "Applying sale"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let remaining: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND is_active = 1 AND stock_quantity >= ?2
            RETURNING stock_quantity
            "#,
        )
        .bind(&sale.product_id)
        .bind(sale.quantity_sold)
        .bind(sale.sale_date)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(remaining_stock) = remaining else {
            let available: Option<i64> = sqlx::query_scalar(
                "SELECT stock_quantity FROM products WHERE id = ?1 AND is_active = 1",
            )
            .bind(&sale.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            tx.rollback().await.map_err(DbError::transaction)?;

            return Ok(match available {
                Some(available) => {
                    debug!(
                        product_id = %sale.product_id,
                        available,
                        requested = sale.quantity_sold,
                        "Sale rejected: insufficient stock"
                    );
                    SaleOutcome::InsufficientStock { available }
                }
                None => SaleOutcome::ProductMissing,
            });
        };

        sqlx::query(
            r#"
            INSERT INTO sales (id, product_id, quantity_sold, sale_price_cents, sale_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(sale.quantity_sold)
        .bind(sale.sale_price_cents)
        .bind(sale.sale_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(DbError::transaction)?;

        debug!(sale_id = %sale.id, remaining_stock, "Sale committed");

        Ok(SaleOutcome::Applied(AppliedSale {
            sale: sale.clone(),
            remaining_stock,
        }))
    }

    /// Every sale, oldest first. Input for report aggregation.
    pub async fn all(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, quantity_sold, sale_price_cents, sale_date
            FROM sales
            ORDER BY sale_date, rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sales joined with product name/SKU, newest first. `limit = None`
    /// returns the whole log.
    pub async fn entries(&self, limit: Option<u32>) -> DbResult<Vec<SaleEntry>> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(i64::from).unwrap_or(-1);
        let sql = format!("{ENTRY_SELECT} ORDER BY s.sale_date DESC, s.rowid DESC LIMIT ?1");

        let entries = sqlx::query_as::<_, SaleEntry>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// One product's sales, newest first.
    pub async fn for_product(&self, product_id: &str) -> DbResult<Vec<SaleEntry>> {
        let sql = format!(
            "{ENTRY_SELECT} WHERE s.product_id = ?1 ORDER BY s.sale_date DESC, s.rowid DESC"
        );

        let entries = sqlx::query_as::<_, SaleEntry>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Tests
// =============================================================================
