//! Product catalog endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use super::AppState;
use crate::dto::{
    ok, ApiResponse, CreateProductRequest, MessageDto, ProductDto, SaleDto, SearchQuery,
    StockQuery, UpdateProductRequest,
};
use crate::error::ApiError;
use flash_core::{NewProduct, ProductUpdate};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/low-stock", get(low_stock_products))
        .route("/sku/{sku}", get(get_product_by_sku))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/stock", put(update_stock))
        .route("/{id}/sales", get(product_sales))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDto>>), ApiError> {
    let Json(body) = body?;
    let input = NewProduct::try_from(body)?;

    let product = state.inventory.add_product(input).await?;
    Ok((StatusCode::CREATED, ok(product.into())))
}

/// Full catalog, or search results when `?search=` is present.
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Vec<ProductDto>> {
    let Query(query) = query?;

    let products = match query.search {
        Some(term) => state.inventory.search_products(&term).await?,
        None => state.inventory.list_products().await?,
    };
    Ok(ok(products.into_iter().map(ProductDto::from).collect()))
}

pub async fn low_stock_products(State(state): State<AppState>) -> ApiResult<Vec<ProductDto>> {
    let products = state.inventory.low_stock_products().await?;
    Ok(ok(products.into_iter().map(ProductDto::from).collect()))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ProductDto> {
    let product = state.inventory.get_product(&id).await?;
    Ok(ok(product.into()))
}

pub async fn get_product_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> ApiResult<ProductDto> {
    let product = state.inventory.get_product_by_sku(&sku).await?;
    Ok(ok(product.into()))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<ProductDto> {
    let Json(body) = body?;
    let update = ProductUpdate::try_from(body)?;

    let product = state.inventory.update_product(&id, update).await?;
    Ok(ok(product.into()))
}

pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<StockQuery>, QueryRejection>,
) -> ApiResult<ProductDto> {
    let Query(query) = query?;

    let product = state.inventory.update_stock(&id, query.new_stock).await?;
    Ok(ok(product.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageDto> {
    state.inventory.delete_product(&id).await?;
    Ok(ok(MessageDto {
        message: format!("Product {} deleted", id),
    }))
}

pub async fn product_sales(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<SaleDto>> {
    let entries = state.sales.sales_for_product(&id).await?;
    Ok(ok(entries.into_iter().map(SaleDto::from).collect()))
}
