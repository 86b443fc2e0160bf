//! Scooter DMS
//!
//! Dealership management API for a multi-store scooter business: parts
//! inventory, stock transfers, purchase receiving, workshop job cards,
//! rentals and a small web shop cart.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod services;

use axum::{
    extract::{FromRef, State},
    response::Json,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use auth::{AuthConfig, AuthService};
use services::{
    cart::InMemorySessionStore,
    reports::CsvReportWriter,
    CartService, CustomerService, FleetService, JobCardService, ProductService, PurchaseService,
    RentalService, ReportService, StaffService, StockService, StoreService, SupplierService,
    TransferService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub auth_service: Arc<AuthService>,
    pub store_service: StoreService,
    pub stock_service: StockService,
    pub fleet_service: FleetService,
    pub transfer_service: TransferService,
    pub supplier_service: SupplierService,
    pub purchase_service: PurchaseService,
    pub job_card_service: JobCardService,
    pub customer_service: CustomerService,
    pub rental_service: RentalService,
    pub product_service: ProductService,
    pub cart_service: CartService,
    pub report_service: ReportService,
    pub staff_service: StaffService,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(AuthConfig::new(
            config.jwt_secret.clone(),
            config.jwt_expiration,
        )));
        let sessions = Arc::new(InMemorySessionStore::new());
        Self {
            auth_service,
            store_service: StoreService::new(db.clone()),
            stock_service: StockService::new(db.clone(), event_sender.clone()),
            fleet_service: FleetService::new(db.clone()),
            transfer_service: TransferService::new(db.clone(), event_sender.clone()),
            supplier_service: SupplierService::new(db.clone()),
            purchase_service: PurchaseService::new(db.clone(), event_sender.clone()),
            job_card_service: JobCardService::new(db.clone(), event_sender.clone()),
            customer_service: CustomerService::new(db.clone()),
            rental_service: RentalService::new(db.clone(), event_sender.clone()),
            product_service: ProductService::new(db.clone()),
            cart_service: CartService::new(db.clone(), sessions, event_sender.clone()),
            report_service: ReportService::new(db.clone(), Arc::new(CsvReportWriter)),
            staff_service: StaffService::new(db.clone()),
            db,
            config,
            event_sender,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth_service.clone()
    }
}

/// Common query parameters for list endpoints
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub search: Option<String>,
    pub status: Option<String>,
}

fn default_page() -> u64 {
    1
}
fn default_per_page() -> u64 {
    20
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            search: None,
            status: None,
        }
    }
}

impl ListQuery {
    /// Clamps page/per_page to sane bounds before hitting the paginator.
    pub fn normalized(&self, max_per_page: u64) -> (u64, u64) {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, max_per_page);
        (page, per_page)
    }
}

// Common response wrappers
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_ok = db::check_connection(&state.db).await.is_ok();
    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": db_ok,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/stores", handlers::stores::routes())
        .nest("/parts", handlers::parts::routes())
        .nest("/scooters", handlers::scooters::routes())
        .nest("/transfers", handlers::transfers::routes())
        .nest("/suppliers", handlers::suppliers::routes())
        .nest("/purchases", handlers::purchases::routes())
        .nest("/job-cards", handlers::job_cards::routes())
        .nest("/customers", handlers::customers::routes())
        .nest("/rentals", handlers::rentals::routes())
        .nest("/products", handlers::products::routes())
        .nest("/cart", handlers::cart::routes())
        .nest("/reports", handlers::reports::routes())
        .nest("/staff", handlers::staff::routes())
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_normalization_clamps_bounds() {
        let query = ListQuery {
            page: 0,
            per_page: 5_000,
            search: None,
            status: None,
        };
        assert_eq!(query.normalized(100), (1, 100));

        let query = ListQuery::default();
        assert_eq!(query.normalized(100), (1, 20));
    }

    #[test]
    fn paginated_response_computes_page_count() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 41, 1, 20);
        assert_eq!(page.total_pages, 3);
        let empty: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 0, 1, 20);
        assert_eq!(empty.total_pages, 0);
    }
}
