use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    auth::AuthStaff,
    entities::job_card::JobCardStatus,
    errors::ServiceError,
    handlers::parse_status,
    services::{access::StoreScope, job_cards::CreateJobCardInput},
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};

#[derive(Debug, Deserialize)]
struct StatusInput {
    status: JobCardStatus,
}

#[derive(Debug, Deserialize)]
struct AddPartInput {
    part_id: i64,
    quantity: Decimal,
    unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ChecklistInput {
    is_checked: bool,
    notes: Option<String>,
}

async fn create_job_card(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Json(input): Json<CreateJobCardInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state.job_card_service.create_job_card(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(detail)),
    ))
}

async fn get_job_card(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let detail = state
        .job_card_service
        .get_job_card(id, StoreScope::for_staff(&staff))
        .await?;
    Ok(Json(ApiResponse::success(detail)))
}

async fn list_job_cards(
    State(state): State<AppState>,
    staff: AuthStaff,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status: Option<JobCardStatus> = parse_status(&query.status)?;
    let (page, per_page) = query.normalized(state.config.api_max_page_size);
    let (cards, total) = state
        .job_card_service
        .list_job_cards(StoreScope::for_staff(&staff), status, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        cards, total, page, per_page,
    ))))
}

async fn update_status(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<StatusInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let card = state.job_card_service.update_status(id, input.status).await?;
    Ok(Json(ApiResponse::success(card)))
}

async fn add_part(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<AddPartInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .job_card_service
        .add_part(id, input.part_id, input.quantity, input.unit_price)
        .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(item)),
    ))
}

async fn remove_part(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path((id, item_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ServiceError> {
    state.job_card_service.remove_part(id, item_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn set_checklist_item(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path((id, checklist_id)): Path<(i64, i64)>,
    Json(input): Json<ChecklistInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .job_card_service
        .set_checklist_item(id, checklist_id, input.is_checked, input.notes)
        .await?;
    Ok(Json(ApiResponse::success(item)))
}

async fn delete_job_card(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state.job_card_service.delete_job_card(id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_job_card).get(list_job_cards))
        .route("/:id", get(get_job_card).delete(delete_job_card))
        .route("/:id/status", put(update_status))
        .route("/:id/parts", post(add_part))
        .route("/:id/parts/:item_id", delete(remove_part))
        .route("/:id/checklist/:checklist_id", put(set_checklist_item))
}
