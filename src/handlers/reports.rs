use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::{
    auth::AuthStaff,
    errors::ServiceError,
    services::{access::StoreScope, reports::ReportFile},
    AppState,
};

fn report_response(file: ReportFile) -> Result<impl IntoResponse, ServiceError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(file.content_type),
    );
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|_| ServiceError::InternalError("Invalid export filename".to_string()))?,
    );
    Ok((headers, file.bytes))
}

async fn export_parts(
    State(state): State<AppState>,
    staff: AuthStaff,
) -> Result<impl IntoResponse, ServiceError> {
    let file = state
        .report_service
        .export_parts(StoreScope::for_staff(&staff))
        .await?;
    report_response(file)
}

async fn export_scooters(
    State(state): State<AppState>,
    staff: AuthStaff,
) -> Result<impl IntoResponse, ServiceError> {
    let file = state
        .report_service
        .export_scooters(StoreScope::for_staff(&staff))
        .await?;
    report_response(file)
}

async fn export_transfers(
    State(state): State<AppState>,
    staff: AuthStaff,
) -> Result<impl IntoResponse, ServiceError> {
    let file = state
        .report_service
        .export_transfers(StoreScope::for_staff(&staff))
        .await?;
    report_response(file)
}

async fn export_purchases(
    State(state): State<AppState>,
    staff: AuthStaff,
) -> Result<impl IntoResponse, ServiceError> {
    let file = state
        .report_service
        .export_purchases(StoreScope::for_staff(&staff))
        .await?;
    report_response(file)
}

async fn export_job_cards(
    State(state): State<AppState>,
    staff: AuthStaff,
) -> Result<impl IntoResponse, ServiceError> {
    let file = state
        .report_service
        .export_job_cards(StoreScope::for_staff(&staff))
        .await?;
    report_response(file)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/parts", get(export_parts))
        .route("/scooters", get(export_scooters))
        .route("/transfers", get(export_transfers))
        .route("/purchases", get(export_purchases))
        .route("/job-cards", get(export_job_cards))
}
