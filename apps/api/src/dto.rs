//! # Wire Types
//!
//! Request and response bodies for the HTTP API.
//!
//! Prices travel as decimals (`9.99`) and are converted to [`Money`] at this
//! boundary. Responses carry the decimal and the exact cent value side by
//! side so clients never have to round.
//!
//! ## Envelope
//! ```json
//! { "success": true, "data": { ... } }
//! ```
//! Errors use the shape produced by [`crate::error::ApiError`].

use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::services::SaleReceipt;
use flash_core::validation::{parse_price, parse_sale_price};
use flash_core::{
    DailySales, DashboardSummary, Money, NewProduct, Product, ProductRef, ProductUpdate,
    SaleEntry, SaleRequest, SalesReport, ValidationError, DEFAULT_MIN_STOCK_LEVEL,
};

// =============================================================================
// Envelope
// =============================================================================

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Wraps `data` in a success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub price: f64,
    pub price_cents: i64,
    pub stock_quantity: i64,
    pub min_stock_level: i64,
    pub category: String,
    /// Stock strictly below the minimum level.
    pub is_low_stock: bool,
    pub is_out_of_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            is_low_stock: p.is_low_stock(),
            is_out_of_stock: p.is_out_of_stock(),
            price: p.price().to_decimal(),
            price_cents: p.price_cents,
            id: p.id,
            name: p.name,
            sku: p.sku,
            description: p.description,
            stock_quantity: p.stock_quantity,
            min_stock_level: p.min_stock_level,
            category: p.category,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleDto {
    pub id: String,
    pub product_id: String,
    pub product_name: Option<String>,
    pub product_sku: Option<String>,
    pub quantity_sold: i64,
    pub sale_price: f64,
    pub sale_price_cents: i64,
    pub total: f64,
    pub total_cents: i64,
    pub sale_date: DateTime<Utc>,
}

impl From<SaleEntry> for SaleDto {
    fn from(entry: SaleEntry) -> Self {
        let sale = entry.sale;
        let total = sale.total();
        SaleDto {
            sale_price: sale.sale_price().to_decimal(),
            sale_price_cents: sale.sale_price_cents,
            total: total.to_decimal(),
            total_cents: total.cents(),
            id: sale.id,
            product_id: sale.product_id,
            product_name: entry.product_name,
            product_sku: entry.product_sku,
            quantity_sold: sale.quantity_sold,
            sale_date: sale.sale_date,
        }
    }
}

/// Response to `POST /sales`.
#[derive(Debug, Clone, Serialize)]
pub struct SaleReceiptDto {
    #[serde(flatten)]
    pub sale: SaleDto,
    pub remaining_stock: i64,
}

impl From<SaleReceipt> for SaleReceiptDto {
    fn from(receipt: SaleReceipt) -> Self {
        SaleReceiptDto {
            sale: receipt.sale.into(),
            remaining_stock: receipt.remaining_stock,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesReportDto {
    pub period_days: i64,
    pub total_sales: i64,
    pub total_revenue: f64,
    pub total_revenue_cents: i64,
    pub total_items_sold: i64,
    pub average_sale_value: f64,
    pub average_sale_value_cents: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<SalesReport> for SalesReportDto {
    fn from(r: SalesReport) -> Self {
        SalesReportDto {
            total_revenue: r.total_revenue().to_decimal(),
            average_sale_value: r.average_sale_value().to_decimal(),
            period_days: r.period_days,
            total_sales: r.total_sales,
            total_revenue_cents: r.total_revenue_cents,
            total_items_sold: r.total_items_sold,
            average_sale_value_cents: r.average_sale_value_cents,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySalesDto {
    pub date: NaiveDate,
    pub total_sales: i64,
    pub total_revenue: f64,
    pub total_revenue_cents: i64,
    pub items_sold: i64,
}

impl From<DailySales> for DailySalesDto {
    fn from(d: DailySales) -> Self {
        DailySalesDto {
            total_revenue: d.total_revenue().to_decimal(),
            date: d.date,
            total_sales: d.total_sales,
            total_revenue_cents: d.total_revenue_cents,
            items_sold: d.items_sold,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardDto {
    pub total_products: i64,
    pub low_stock_count: i64,
    pub window_days: i64,
    pub recent_sales_count: i64,
    pub recent_revenue: f64,
    pub recent_revenue_cents: i64,
}

impl From<DashboardSummary> for DashboardDto {
    fn from(s: DashboardSummary) -> Self {
        DashboardDto {
            recent_revenue: Money::from_cents(s.recent_revenue_cents).to_decimal(),
            total_products: s.total_products,
            low_stock_count: s.low_stock_count,
            window_days: s.window_days,
            recent_sales_count: s.recent_sales_count,
            recent_revenue_cents: s.recent_revenue_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfoDto {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub message: String,
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: i64,
    pub min_stock_level: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<CreateProductRequest> for NewProduct {
    type Error = ValidationError;

    fn try_from(req: CreateProductRequest) -> Result<Self, Self::Error> {
        let mut input = NewProduct::new(
            req.name,
            req.sku,
            parse_price(req.price, "price")?,
            req.stock_quantity,
        )
        .min_stock_level(req.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL));

        if let Some(category) = req.category {
            input = input.category(category);
        }
        if let Some(description) = req.description {
            input = input.description(description);
        }
        Ok(input)
    }
}

/// Body of `PUT /products/{id}`. Absent fields are left alone;
/// `"description": null` clears the description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i64>,
    pub min_stock_level: Option<i64>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TryFrom<UpdateProductRequest> for ProductUpdate {
    type Error = ValidationError;

    fn try_from(req: UpdateProductRequest) -> Result<Self, Self::Error> {
        Ok(ProductUpdate {
            name: req.name,
            sku: req.sku,
            price: req.price.map(|p| parse_price(p, "price")).transpose()?,
            stock_quantity: req.stock_quantity,
            min_stock_level: req.min_stock_level,
            category: req.category,
            description: req.description,
        })
    }
}

/// Body of `POST /sales`. The product is named by `product_id` or `sku`;
/// when both are given the id wins.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordSaleRequest {
    pub product_id: Option<String>,
    pub sku: Option<String>,
    pub quantity: i64,
    pub sale_price: Option<f64>,
    pub sale_date: Option<DateTime<Utc>>,
}

impl TryFrom<RecordSaleRequest> for SaleRequest {
    type Error = ValidationError;

    fn try_from(req: RecordSaleRequest) -> Result<Self, Self::Error> {
        let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

        let product = match (non_blank(req.product_id), non_blank(req.sku)) {
            (Some(id), _) => ProductRef::Id(id),
            (None, Some(sku)) => ProductRef::Sku(sku),
            (None, None) => {
                return Err(ValidationError::Required {
                    field: "product_id or sku".to_string(),
                })
            }
        };

        let mut request = SaleRequest::new(product, req.quantity);
        if let Some(price) = req.sale_price.map(parse_sale_price).transpose()?.flatten() {
            request = request.sale_price(price);
        }
        if let Some(date) = req.sale_date {
            request = request.sale_date(date);
        }
        Ok(request)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockQuery {
    pub new_stock: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}
