use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    auth::{AuthStaff, RequireAdmin},
    errors::ServiceError,
    services::stores::{CreateStoreInput, UpdateStoreInput},
    ApiResponse, AppState,
};

#[derive(Debug, Deserialize)]
struct StoreListQuery {
    #[serde(default)]
    include_inactive: bool,
}

async fn create_store(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateStoreInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.store_service.create_store(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(store)),
    ))
}

async fn get_store(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.store_service.get_store(id).await?;
    Ok(Json(ApiResponse::success(store)))
}

async fn list_stores(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Query(query): Query<StoreListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let stores = state
        .store_service
        .list_stores(query.include_inactive)
        .await?;
    Ok(Json(ApiResponse::success(stores)))
}

async fn update_store(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(input): Json<UpdateStoreInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.store_service.update_store(id, input).await?;
    Ok(Json(ApiResponse::success(store)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_store).get(list_stores))
        .route("/:id", get(get_store).put(update_store))
}
