use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::{
    auth::AuthStaff,
    entities::scooter::ScooterStatus,
    errors::ServiceError,
    handlers::parse_status,
    services::{
        access::StoreScope,
        fleet::{CreateScooterInput, UpdateScooterInput},
    },
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};

async fn create_scooter(
    State(state): State<AppState>,
    _staff: AuthStaff,
    Json(input): Json<CreateScooterInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let scooter = state.fleet_service.create_scooter(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(scooter)),
    ))
}

async fn get_scooter(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let scooter = state
        .fleet_service
        .get_scooter(id, StoreScope::for_staff(&staff))
        .await?;
    Ok(Json(ApiResponse::success(scooter)))
}

async fn list_scooters(
    State(state): State<AppState>,
    staff: AuthStaff,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let status: Option<ScooterStatus> = parse_status(&query.status)?;
    let (page, per_page) = query.normalized(state.config.api_max_page_size);
    let (scooters, total) = state
        .fleet_service
        .list_scooters(StoreScope::for_staff(&staff), status, page, per_page)
        .await?;
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        scooters, total, page, per_page,
    ))))
}

async fn update_scooter(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
    Json(input): Json<UpdateScooterInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let scooter = state
        .fleet_service
        .update_scooter(id, StoreScope::for_staff(&staff), input)
        .await?;
    Ok(Json(ApiResponse::success(scooter)))
}

async fn delete_scooter(
    State(state): State<AppState>,
    staff: AuthStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .fleet_service
        .delete_scooter(id, StoreScope::for_staff(&staff))
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_scooter).get(list_scooters))
        .route(
            "/:id",
            get(get_scooter).put(update_scooter).delete(delete_scooter),
        )
}
