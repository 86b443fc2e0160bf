mod common;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
};
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

use scooter_dms::{
    app_router,
    auth::AuthStaff,
    config::AppConfig,
    entities::staff_profile::StaffRole,
    AppState,
};

use common::TestDb;

struct TestApi {
    state: AppState,
}

impl TestApi {
    async fn new() -> (Self, TestDb) {
        let harness = TestDb::new().await;
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only".to_string(),
            3600,
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        let state = AppState::new(harness.db.clone(), cfg, harness.events.clone());
        (Self { state }, harness)
    }

    fn token_for(&self, staff_id: i64, role: StaffRole, store_id: Option<i64>) -> String {
        self.state
            .auth_service
            .generate_token(&AuthStaff {
                staff_id,
                username: format!("user{}", staff_id),
                role,
                store_id,
            })
            .expect("token generation")
    }

    async fn get_json(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = builder.body(Body::empty()).expect("request");

        let response = app_router(self.state.clone())
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
    let (api, _harness) = TestApi::new().await;
    let (status, _) = api.get_json("/api/v1/parts", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn store_assignment_limits_part_visibility_over_http() {
    let (api, harness) = TestApi::new().await;
    let store_a = harness.seed_store("North").await;
    let store_b = harness.seed_store("South").await;
    harness.seed_part("HTTP-A", store_a, dec!(5)).await;
    harness.seed_part("HTTP-B", store_b, dec!(5)).await;

    let scoped_token = api.token_for(1, StaffRole::Staff, Some(store_a));
    let (status, json) = api.get_json("/api/v1/parts", Some(&scoped_token)).await;
    assert_eq!(status, StatusCode::OK);
    let items = json["data"]["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["part_number"], "HTTP-A");

    let admin_token = api.token_for(2, StaffRole::Admin, None);
    let (status, json) = api.get_json("/api/v1/parts", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    let items = json["data"]["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);

    // Staff with no store assignment also see everything.
    let unassigned_token = api.token_for(3, StaffRole::Staff, None);
    let (_, json) = api.get_json("/api/v1/parts", Some(&unassigned_token)).await;
    assert_eq!(json["data"]["items"].as_array().expect("items").len(), 2);
}

#[tokio::test]
async fn staff_management_requires_the_admin_role() {
    let (api, _harness) = TestApi::new().await;

    let staff_token = api.token_for(1, StaffRole::Staff, None);
    let (status, _) = api.get_json("/api/v1/staff", Some(&staff_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = api.token_for(2, StaffRole::Admin, None);
    let (status, _) = api.get_json("/api/v1/staff", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_endpoint_reports_database_status() {
    let (api, _harness) = TestApi::new().await;
    let (status, json) = api.get_json("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], true);
}
