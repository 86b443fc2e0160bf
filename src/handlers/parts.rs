use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    auth::AuthStaff,
    errors::ServiceError,
    services::{
        access::StoreScope,
        stock::{CreatePartInput, UpdatePartInput},
    },
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};

#[derive(Debug, Deserialize)]
struct AdjustStockInput {
    delta: Decimal,
    reason: Option<String>,
}

async fn create_part(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Json(input): Json<CreatePartInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let part = state.stock_service.create_part(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(part)),
    ))
}

async fn get_part(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let part = state
        .stock_service
        .get_part(id, StoreScope::for_staff(&staff))
        .await?;
    Ok(Json(ApiResponse::success(part)))
}

async fn list_parts(
    State(state): State<AppState>,
    staff: AuthStaff,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = query.normalized(state.config.api_max_page_size);
    let (parts, total) = state
        .stock_service
        .list_parts(StoreScope::for_staff(&staff), query.search, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        parts, total, page, per_page,
    ))))
}

async fn low_stock(
    State(state): State<AppState>,
    staff: AuthStaff,
) -> Result<impl IntoResponse, ServiceError> {
    let parts = state
        .stock_service
        .low_stock_parts(StoreScope::for_staff(&staff))
        .await?;
    Ok(Json(ApiResponse::success(parts)))
}

async fn update_part(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<UpdatePartInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let part = state
        .stock_service
        .update_part(id, StoreScope::for_staff(&staff), input)
        .await?;
    Ok(Json(ApiResponse::success(part)))
}

async fn delete_part(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .stock_service
        .delete_part(id, StoreScope::for_staff(&staff))
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn adjust_stock(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<AdjustStockInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let reason = input
        .reason
        .unwrap_or_else(|| "manual adjustment".to_string());
    let part = state
        .stock_service
        .adjust(id, StoreScope::for_staff(&staff), input.delta, reason)
        .await?;
    Ok(Json(ApiResponse::success(part)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_part).get(list_parts))
        .route("/low-stock", get(low_stock))
        .route("/:id", get(get_part).put(update_part).delete(delete_part))
        .route("/:id/adjust", post(adjust_stock))
}
