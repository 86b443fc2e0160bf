use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ServiceError, services::cart::SessionCart, ApiResponse, AppState};

const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Deserialize)]
struct AddItemInput {
    product_id: i64,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct UpdateItemInput {
    quantity: u32,
}

#[derive(Debug, Serialize)]
struct CartView {
    session_id: String,
    cart: SessionCart,
    total: Decimal,
    item_count: u32,
}

impl CartView {
    fn new(session_id: String, cart: SessionCart) -> Self {
        let total = cart.total();
        let item_count = cart.item_count();
        Self {
            session_id,
            cart,
            total,
            item_count,
        }
    }
}

/// Reads the session id header, minting a fresh id when the client has none
/// yet. The id is echoed back in every cart response.
fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

async fn get_cart(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let sid = session_id(&headers);
    let cart = state.cart_service.get_cart(&sid);
    Json(ApiResponse::success(CartView::new(sid, cart)))
}

async fn add_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<AddItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let sid = session_id(&headers);
    let cart = state
        .cart_service
        .add_item(&sid, input.product_id, input.quantity)
        .await?;
    Ok(Json(ApiResponse::success(CartView::new(sid, cart))))
}

async fn update_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
    Json(input): Json<UpdateItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let sid = session_id(&headers);
    let cart = state
        .cart_service
        .update_item(&sid, product_id, input.quantity)
        .await?;
    Ok(Json(ApiResponse::success(CartView::new(sid, cart))))
}

async fn remove_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let sid = session_id(&headers);
    let cart = state.cart_service.remove_item(&sid, product_id).await?;
    Ok(Json(ApiResponse::success(CartView::new(sid, cart))))
}

async fn clear_cart(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let sid = session_id(&headers);
    state.cart_service.clear(&sid).await;
    Json(ApiResponse::success(CartView::new(
        sid,
        SessionCart::default(),
    )))
}

/// Checkout clears the session and hands back a confirmation id. Order
/// fulfilment is outside the API; product stock is untouched.
async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    let sid = session_id(&headers);
    let cart = state.cart_service.get_cart(&sid);
    if cart.items.is_empty() {
        return Err(ServiceError::InvalidOperation(
            "Cannot check out an empty cart".to_string(),
        ));
    }
    let total = cart.total();
    state.cart_service.clear(&sid).await;
    Ok(Json(ApiResponse::success(serde_json::json!({
        "confirmation_id": Uuid::new_v4().to_string(),
        "total": total,
    }))))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/:product_id", put(update_item).delete(remove_item))
        .route("/checkout", post(checkout))
}
