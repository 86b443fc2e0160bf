use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    auth::AuthStaff,
    errors::ServiceError,
    services::suppliers::{CreateSupplierInput, UpdateSupplierInput},
    ApiResponse, AppState,
};

#[derive(Debug, Deserialize)]
struct SupplierListQuery {
    #[serde(default)]
    include_inactive: bool,
}

async fn create_supplier(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Json(input): Json<CreateSupplierInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.supplier_service.create_supplier(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(supplier)),
    ))
}

async fn get_supplier(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.supplier_service.get_supplier(id).await?;
    Ok(Json(ApiResponse::success(supplier)))
}

async fn list_suppliers(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Query(query): Query<SupplierListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let suppliers = state
        .supplier_service
        .list_suppliers(query.include_inactive)
        .await?;
    Ok(Json(ApiResponse::success(suppliers)))
}

async fn update_supplier(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<UpdateSupplierInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let supplier = state.supplier_service.update_supplier(id, input).await?;
    Ok(Json(ApiResponse::success(supplier)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_supplier).get(list_suppliers))
        .route("/:id", get(get_supplier).put(update_supplier))
}
