use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::{
    auth::{AuthStaff, RequireAdmin},
    errors::ServiceError,
    services::staff::{CreateStaffInput, UpdateStaffInput},
    ApiResponse, AppState,
};

async fn create_staff(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateStaffInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let staff = state.staff_service.create_staff(input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(ApiResponse::success(staff)),
    ))
}

async fn get_staff(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let staff = state.staff_service.get_staff(id).await?;
    Ok(Json(ApiResponse::success(staff)))
}

async fn list_staff(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, ServiceError> {
    let staff = state.staff_service.list_staff().await?;
    Ok(Json(ApiResponse::success(staff)))
}

async fn update_staff(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(input): Json<UpdateStaffInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let staff = state.staff_service.update_staff(id, input).await?;
    Ok(Json(ApiResponse::success(staff)))
}

/// Mints a bearer token for a staff profile. Identity verification happens
/// upstream; only admins can issue tokens here.
async fn issue_token(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let staff = state.staff_service.get_staff(id).await?;
    let subject = AuthStaff {
        staff_id: staff.id,
        username: staff.username.clone(),
        role: staff.role,
        store_id: staff.store_id,
    };
    let token = state
        .auth_service
        .generate_token(&subject)
        .map_err(|e| ServiceError::InternalError(e.to_string()))?;
    Ok(Json(ApiResponse::success(json!({
        "token": token,
        "staff_id": staff.id,
        "username": staff.username,
    }))))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_staff).get(list_staff))
        .route("/:id", get(get_staff).put(update_staff))
        .route("/:id/token", post(issue_token))
}
