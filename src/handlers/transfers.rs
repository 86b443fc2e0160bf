use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::{
    auth::AuthStaff,
    entities::stock_transfer::TransferStatus,
    errors::ServiceError,
    handlers::parse_status,
    services::{access::StoreScope, transfers::CreateTransferInput},
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};

async fn create_transfer(
    State(state): State<AppState>,
    staff: AuthStaff,
    Json(mut input): Json<CreateTransferInput>,
) -> Result<impl IntoResponse, ServiceError> {
    if input.created_by.is_none() {
        input.created_by = Some(staff.username.clone());
    }
    let transfer = state.transfer_service.create_transfer(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(transfer)),
    ))
}

async fn get_transfer(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let transfer = state
        .transfer_service
        .get_transfer(id, StoreScope::for_staff(&staff))
        .await?;
    Ok(Json(ApiResponse::success(transfer)))
}

async fn list_transfers(
    State(state): State<AppState>,
    staff: AuthStaff,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status: Option<TransferStatus> = parse_status(&query.status)?;
    let (page, per_page) = query.normalized(state.config.api_max_page_size);
    let (transfers, total) = state
        .transfer_service
        .list_transfers(StoreScope::for_staff(&staff), status, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        transfers, total, page, per_page,
    ))))
}

async fn complete_transfer(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let transfer = state.transfer_service.complete_transfer(id).await?;
    Ok(Json(ApiResponse::success(transfer)))
}

async fn cancel_transfer(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let transfer = state.transfer_service.cancel_transfer(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        transfer,
        "Transfer cancelled; source stock is not restored",
    )))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_transfer).get(list_transfers))
        .route("/:id", get(get_transfer))
        .route("/:id/complete", post(complete_transfer))
        .route("/:id/cancel", post(cancel_transfer))
}
