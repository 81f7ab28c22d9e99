use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use tracing::warn;

use super::AppState;
use crate::dto::{ok, HealthDto, ServiceInfoDto};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}

pub async fn banner() -> impl IntoResponse {
    ok(ServiceInfoDto {
        name: "Flash Inventory API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

/// 200 when storage answers, 503 otherwise. The body uses the success
/// envelope either way so monitors can read `data.database`.
pub async fn health(State(state): State<AppState>) -> Response {
    let healthy = state.store.health_check().await;
    let status = if healthy {
        StatusCode::OK
    } else {
        warn!("Health check failed: storage unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = ok(HealthDto {
        status: if healthy { "healthy" } else { "unhealthy" },
        database: if healthy { "connected" } else { "unreachable" },
        timestamp: Utc::now(),
    });
    (status, body).into_response()
}
