//! Sales reports and the dashboard summary.
//!
//! The store hands back rows; the aggregation itself lives in
//! `flash_core::report` so it can be tested with a pinned clock.

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use super::ServiceResult;
use flash_core::report::daily_breakdown;
use flash_core::validation::validate_period_days;
use flash_core::{DailySales, DashboardSummary, SalesReport, DASHBOARD_WINDOW_DAYS};
use flash_db::LedgerStore;

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn LedgerStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        ReportService { store }
    }

    /// Totals over the trailing `days`.
    pub async fn sales_report(&self, days: i64) -> ServiceResult<SalesReport> {
        let days = validate_period_days(days)?;
        let sales = self.store.all_sales().await?;

        debug!(days, sales = sales.len(), "Computing sales report");
        Ok(SalesReport::compute(&sales, days, Utc::now()))
    }

    /// Per-date totals for the `days` most recent dates with sales.
    pub async fn daily_breakdown(&self, days: i64) -> ServiceResult<Vec<DailySales>> {
        let days = validate_period_days(days)?;
        let sales = self.store.all_sales().await?;

        Ok(daily_breakdown(&sales, usize::try_from(days).unwrap_or(usize::MAX)))
    }

    pub async fn dashboard_summary(&self) -> ServiceResult<DashboardSummary> {
        let products = self.store.list_products().await?;
        let sales = self.store.all_sales().await?;

        Ok(DashboardSummary::compute(
            &products,
            &sales,
            DASHBOARD_WINDOW_DAYS,
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;
    use chrono::Duration;
    use flash_core::{CoreError, Money, NewProduct, Product, Sale};
    use flash_db::InMemoryStore;
    use uuid::Uuid;

    async fn seeded() -> ReportService {
        let store = Arc::new(InMemoryStore::new());
        let widget = Product::new(
            NewProduct::new("Widget", "W1", Money::from_cents(999), 100),
            Utc::now(),
        );
        let gadget = Product::new(
            NewProduct::new("Gadget", "G1", Money::from_cents(500), 2),
            Utc::now(),
        );
        store.insert_product(&widget).await.unwrap();
        store.insert_product(&gadget).await.unwrap();

        // Two sales today, one ten days ago
        for (qty, days_ago) in [(3, 0), (1, 0), (2, 10)] {
            let sale = Sale {
                id: Uuid::new_v4().to_string(),
                product_id: widget.id.clone(),
                quantity_sold: qty,
                sale_price_cents: 999,
                sale_date: Utc::now() - Duration::days(days_ago),
            };
            store.apply_sale(&sale).await.unwrap();
        }

        ReportService::new(store)
    }

    #[tokio::test]
    async fn test_reports_survive_totals_beyond_i64() {
        let store = Arc::new(InMemoryStore::new());
        let bulk = Product::new(
            NewProduct::new(
                "Bulk",
                "B1",
                Money::from_cents(flash_core::MAX_PRICE_CENTS),
                10 * flash_core::MAX_QUANTITY,
            ),
            Utc::now(),
        );
        store.insert_product(&bulk).await.unwrap();

        // Each sale is 1e18 cents; ten of them exceed i64::MAX
        for _ in 0..10 {
            let sale = Sale {
                id: Uuid::new_v4().to_string(),
                product_id: bulk.id.clone(),
                quantity_sold: flash_core::MAX_QUANTITY,
                sale_price_cents: flash_core::MAX_PRICE_CENTS,
                sale_date: Utc::now(),
            };
            store.apply_sale(&sale).await.unwrap();
        }
        let reports = ReportService::new(store);

        let report = reports.sales_report(30).await.unwrap();
        assert_eq!(report.total_sales, 10);
        assert_eq!(report.total_revenue_cents, i64::MAX);
        assert_eq!(report.total_items_sold, 10 * flash_core::MAX_QUANTITY);

        let days = reports.daily_breakdown(7).await.unwrap();
        assert_eq!(days[0].total_revenue_cents, i64::MAX);

        let dashboard = reports.dashboard_summary().await.unwrap();
        assert_eq!(dashboard.recent_revenue_cents, i64::MAX);
    }

    #[tokio::test]
    async fn test_sales_report_window() {
        let reports = seeded().await;

        let week = reports.sales_report(7).await.unwrap();
        assert_eq!(week.total_sales, 2);
        assert_eq!(week.total_items_sold, 4);
        assert_eq!(week.total_revenue_cents, 3996);
        assert_eq!(week.average_sale_value_cents, 1998);

        let month = reports.sales_report(30).await.unwrap();
        assert_eq!(month.total_sales, 3);
    }

    #[tokio::test]
    async fn test_empty_window_is_zero() {
        let reports = seeded().await;

        let report = reports.sales_report(0).await.unwrap();
        assert_eq!(report.total_sales, 0);
        assert_eq!(report.average_sale_value_cents, 0);

        assert!(matches!(
            reports.sales_report(-1).await,
            Err(ServiceError::Core(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_daily_breakdown() {
        let reports = seeded().await;

        let days = reports.daily_breakdown(7).await.unwrap();
        assert_eq!(days.len(), 2);
        assert!(days[0].date > days[1].date);
        assert_eq!(days[0].total_sales, 2);

        assert_eq!(reports.daily_breakdown(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_summary() {
        let summary = seeded().await.dashboard_summary().await.unwrap();

        assert_eq!(summary.total_products, 2);
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.window_days, 7);
        assert_eq!(summary.recent_sales_count, 2);
        assert_eq!(summary.recent_revenue_cents, 3996);
    }
}
