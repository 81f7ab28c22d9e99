//! # Report Module
//!
//! Sales aggregation over rows already read from storage.
//!
//! ## Report Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   flash-db                      flash-core (THIS MODULE)                │
//! │   ────────                      ─────────────────────────               │
//! │   all_sales() ──► [Sale] ──┬──► SalesReport::compute(period, now)       │
//! │                            │      filter sale_date > now - period       │
//! │                            │      count / Σ total / Σ qty / average     │
//! │                            │                                            │
//! │                            └──► daily_breakdown(days)                   │
//! │                                   group by UTC date, newest first,      │
//! │                                   keep `days` dates                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure function of its inputs. `now` is passed in so
//! tests can pin the clock.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Sale};

// =============================================================================
// Sales Report
// =============================================================================

/// Totals for the sales made within a trailing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub period_days: i64,
    pub total_sales: i64,
    pub total_revenue_cents: i64,
    pub total_items_sold: i64,

    /// Revenue divided by sale count, rounded to the cent. Zero when empty.
    pub average_sale_value_cents: i64,

    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,

    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,
}

impl SalesReport {
    /// Aggregates the sales strictly newer than `now - period_days`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use flash_core::SalesReport;
    ///
    /// let report = SalesReport::compute(&[], 30, Utc::now());
    /// assert_eq!(report.total_sales, 0);
    /// assert_eq!(report.average_sale_value_cents, 0);
    /// ```
    pub fn compute(sales: &[Sale], period_days: i64, now: DateTime<Utc>) -> Self {
        let start = window_start(now, period_days);

        let mut total_sales = 0i64;
        let mut revenue = Money::zero();
        let mut items = 0i64;

        for sale in sales.iter().filter(|s| s.sale_date > start) {
            total_sales += 1;
            revenue += sale.total();
            items = items.saturating_add(sale.quantity_sold);
        }

        SalesReport {
            period_days,
            total_sales,
            total_revenue_cents: revenue.cents(),
            total_items_sold: items,
            average_sale_value_cents: revenue.average_over(total_sales as u64).cents(),
            start_date: start,
            end_date: now,
        }
    }

    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }

    pub fn average_sale_value(&self) -> Money {
        Money::from_cents(self.average_sale_value_cents)
    }
}

/// Start of a trailing window. Periods too large for the calendar clamp to
/// the earliest representable instant.
fn window_start(now: DateTime<Utc>, period_days: i64) -> DateTime<Utc> {
    Duration::try_days(period_days)
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

// =============================================================================
// Daily Breakdown
// =============================================================================

/// One calendar day (UTC) of sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySales {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total_sales: i64,
    pub total_revenue_cents: i64,
    pub items_sold: i64,
}

impl DailySales {
    pub fn total_revenue(&self) -> Money {
        Money::from_cents(self.total_revenue_cents)
    }
}

/// Groups sales by UTC calendar date, newest date first, keeping at most
/// `days` dates.
///
/// Dates without sales are not filled in: the result holds the `days` most
/// recent dates that have at least one sale.
pub fn daily_breakdown(sales: &[Sale], days: usize) -> Vec<DailySales> {
    let mut by_date: BTreeMap<NaiveDate, DailySales> = BTreeMap::new();

    for sale in sales {
        let date = sale.sale_date.date_naive();
        let day = by_date.entry(date).or_insert_with(|| DailySales {
            date,
            total_sales: 0,
            total_revenue_cents: 0,
            items_sold: 0,
        });
        day.total_sales += 1;
        day.total_revenue_cents = day
            .total_revenue_cents
            .saturating_add(sale.total().cents());
        day.items_sold = day.items_sold.saturating_add(sale.quantity_sold);
    }

    by_date.into_values().rev().take(days).collect()
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub total_products: i64,
    pub low_stock_count: i64,
    pub window_days: i64,
    pub recent_sales_count: i64,
    pub recent_revenue_cents: i64,
}

impl DashboardSummary {
    /// `products` is the active catalog; `sales` may be the full log.
    pub fn compute(
        products: &[Product],
        sales: &[Sale],
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let recent = SalesReport::compute(sales, window_days, now);

        DashboardSummary {
            total_products: products.len() as i64,
            low_stock_count: products.iter().filter(|p| p.is_low_stock()).count() as i64,
            window_days,
            recent_sales_count: recent.total_sales,
            recent_revenue_cents: recent.total_revenue_cents,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
