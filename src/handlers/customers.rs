use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::{
    auth::AuthStaff,
    errors::ServiceError,
    services::customers::{CreateCustomerInput, UpdateCustomerInput},
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};

async fn create_customer(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Json(input): Json<CreateCustomerInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let customer = state.customer_service.create_customer(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(customer)),
    ))
}

async fn get_customer(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let customer = state.customer_service.get_customer(id).await?;
    Ok(Json(ApiResponse::success(customer)))
}

async fn list_customers(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = query.normalized(state.config.api_max_page_size);
    let (customers, total) = state
        .customer_service
        .list_customers(query.search, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        customers, total, page, per_page,
    ))))
}

async fn update_customer(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<UpdateCustomerInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let customer = state.customer_service.update_customer(id, input).await?;
    Ok(Json(ApiResponse::success(customer)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route("/:id", get(get_customer).put(update_customer))
}
