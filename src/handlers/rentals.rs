use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::AuthStaff,
    entities::scooter::ScooterCategory,
    entities::rental::RentalStatus,
    errors::ServiceError,
    handlers::parse_status,
    services::{
        access::StoreScope,
        rentals::{price_for, CreateRentalInput, ReturnRentalInput},
    },
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};

#[derive(Debug, Deserialize)]
struct QuoteQuery {
    category: ScooterCategory,
    days: i64,
}

async fn create_rental(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Json(input): Json<CreateRentalInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let rental = state.rental_service.create_rental(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(rental)),
    ))
}

async fn get_rental(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let rental = state
        .rental_service
        .get_rental(id, StoreScope::for_staff(&staff))
        .await?;
    Ok(Json(ApiResponse::success(rental)))
}

async fn list_rentals(
    State(state): State<AppState>,
    staff: AuthStaff,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status: Option<RentalStatus> = parse_status(&query.status)?;
    let (page, per_page) = query.normalized(state.config.api_max_page_size);
    let (rentals, total) = state
        .rental_service
        .list_rentals(StoreScope::for_staff(&staff), status, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        rentals, total, page, per_page,
    ))))
}

async fn return_rental(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<ReturnRentalInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let rental = state.rental_service.return_rental(id, input).await?;
    Ok(Json(ApiResponse::success(rental)))
}

async fn cancel_rental(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let rental = state.rental_service.cancel_rental(id).await?;
    Ok(Json(ApiResponse::success(rental)))
}

async fn mark_overdue(
    State(state): State<AppState>,
    _staff: AuthStaff,
) -> Result<impl IntoResponse, ServiceError> {
    let count = state.rental_service.mark_overdue().await?;
    Ok(Json(ApiResponse::success(json!({ "marked": count }))))
}

/// Per-day rate quote from the category pricing table, without touching
/// any rental record.
async fn quote(
    _staff: AuthStaff,
    Query(query): Query<QuoteQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    if query.days < 1 {
        return Err(ServiceError::ValidationError(
            "Rental duration must be at least one day".to_string(),
        ));
    }
    let daily_rate = price_for(query.category, query.days);
    Ok(Json(ApiResponse::success(json!({
        "category": query.category,
        "days": query.days,
        "daily_rate": daily_rate,
        "total": daily_rate * rust_decimal::Decimal::from(query.days),
    }))))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_rental).get(list_rentals))
        .route("/quote", get(quote))
        .route("/mark-overdue", post(mark_overdue))
        .route("/:id", get(get_rental))
        .route("/:id/return", post(return_rental))
        .route("/:id/cancel", post(cancel_rental))
}
