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
    entities::purchase::PurchaseStatus,
    errors::ServiceError,
    handlers::parse_status,
    services::{
        access::StoreScope,
        purchases::{CreatePurchaseInput, UpdatePurchaseInput},
    },
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};

#[derive(Debug, Deserialize)]
struct PaymentInput {
    amount: Decimal,
}

async fn create_purchase(
    State(state): State<AppState>,
    staff: AuthStaff,
    Json(mut input): Json<CreatePurchaseInput>,
) -> Result<impl IntoResponse, ServiceError> {
    if input.created_by.is_none() {
        input.created_by = Some(staff.username.clone());
    }
    let purchase = state.purchase_service.create_purchase(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(purchase)),
    ))
}

async fn get_purchase(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let purchase = state
        .purchase_service
        .get_purchase(id, StoreScope::for_staff(&staff))
        .await?;
    Ok(Json(ApiResponse::success(purchase)))
}

async fn list_purchases(
    State(state): State<AppState>,
    staff: AuthStaff,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status: Option<PurchaseStatus> = parse_status(&query.status)?;
    let (page, per_page) = query.normalized(state.config.api_max_page_size);
    let (purchases, total) = state
        .purchase_service
        .list_purchases(StoreScope::for_staff(&staff), status, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        purchases, total, page, per_page,
    ))))
}

async fn update_purchase(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<UpdatePurchaseInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let purchase = state.purchase_service.update_purchase(id, input).await?;
    Ok(Json(ApiResponse::success(purchase)))
}

async fn delete_purchase(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.purchase_service.delete_purchase(id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn record_payment(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<PaymentInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let purchase = state
        .purchase_service
        .record_payment(id, input.amount)
        .await?;
    Ok(Json(ApiResponse::success(purchase)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase).get(list_purchases))
        .route(
            "/:id",
            get(get_purchase)
                .put(update_purchase)
                .delete(delete_purchase),
        )
        .route("/:id/payments", post(record_payment))
}
