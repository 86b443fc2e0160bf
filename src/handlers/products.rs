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
    services::products::{CreateProductInput, UpdateProductInput},
    ApiResponse, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize)]
struct ProductListQuery {
    category: Option<String>,
    #[serde(default)]
    featured_only: bool,
    #[serde(default = "default_page")]
    page: u64,
    #[serde(default = "default_per_page")]
    per_page: u64,
}

fn default_page() -> u64 {
    1
}
fn default_per_page() -> u64 {
    20
}

async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateProductInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.product_service.create_product(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(product)),
    ))
}

async fn get_product(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.product_service.get_product(id).await?;
    Ok(Json(ApiResponse::success(product)))
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, state.config.api_max_page_size);
    let (products, total) = state
        .product_service
        .list_products(query.category, query.featured_only, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        products, total, page, per_page,
    ))))
}

async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(input): Json<UpdateProductInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state.product_service.update_product(id, input).await?;
    Ok(Json(ApiResponse::success(product)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product).put(update_product))
}
