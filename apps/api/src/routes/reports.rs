//! Reporting endpoints.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use super::AppState;
use crate::dto::{ok, ApiResponse, DailySalesDto, DashboardDto, DaysQuery, SalesReportDto};
use crate::error::ApiError;
use flash_core::{DEFAULT_DAILY_DAYS, DEFAULT_REPORT_DAYS};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports/sales", get(sales_report))
        .route("/reports/daily", get(daily_breakdown))
        .route("/dashboard", get(dashboard))
}

pub async fn sales_report(
    State(state): State<AppState>,
    query: Result<Query<DaysQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<SalesReportDto>>, ApiError> {
    let Query(query) = query?;
    let days = query.days.unwrap_or(DEFAULT_REPORT_DAYS);

    let report = state.reports.sales_report(days).await?;
    Ok(ok(report.into()))
}

pub async fn daily_breakdown(
    State(state): State<AppState>,
    query: Result<Query<DaysQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<DailySalesDto>>>, ApiError> {
    let Query(query) = query?;
    let days = query.days.unwrap_or(DEFAULT_DAILY_DAYS as i64);

    let days = state.reports.daily_breakdown(days).await?;
    Ok(ok(days.into_iter().map(DailySalesDto::from).collect()))
}

pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let summary = state.reports.dashboard_summary().await?;
    Ok(ok(summary.into()))
}
