//! Sale recording and the sale log.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::AppState;
use crate::dto::{ok, ApiResponse, LimitQuery, RecordSaleRequest, SaleDto, SaleReceiptDto};
use crate::error::ApiError;
use flash_core::SaleRequest;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_sales).post(record_sale))
}

pub async fn record_sale(
    State(state): State<AppState>,
    body: Result<Json<RecordSaleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SaleReceiptDto>>), ApiError> {
    let Json(body) = body?;
    let request = SaleRequest::try_from(body)?;

    let receipt = state.sales.apply_sale(request).await?;
    Ok((StatusCode::CREATED, ok(receipt.into())))
}

/// Newest first. Without `?limit=` the whole log is returned.
pub async fn list_sales(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<SaleDto>>>, ApiError> {
    let Query(query) = query?;

    let entries = match query.limit {
        Some(limit) => state.sales.recent_sales(limit).await?,
        None => state.sales.sales_log().await?,
    };
    Ok(ok(entries.into_iter().map(SaleDto::from).collect()))
}
