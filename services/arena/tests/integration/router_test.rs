use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use deadpool_redis::Runtime;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use courtside_arena::router::build_router;
use courtside_arena::state::AppState;
use courtside_testing::auth::{MockAuth, TEST_JWT_SECRET};

use crate::helpers::OTP_SECRET;

/// A router whose stores are never reached: every request here is answered
/// before a handler touches Postgres or Redis.
fn server() -> TestServer {
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:1")
        .create_pool(Some(Runtime::Tokio1))
        .unwrap();
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        redis,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        otp_secret: OTP_SECRET.to_owned(),
        access_token_ttl_secs: 3600,
        otp_ttl_secs: 300,
        otp_max_attempts: 3,
        payment_link_base: "https://pay.example".to_owned(),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn healthz_answers_with_a_request_id() {
    let response = server().get("/healthz").await;

    response.assert_status_ok();
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn me_without_token_is_unauthenticated() {
    let response = server().get("/auth/me").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn me_with_forged_token_is_invalid() {
    let server = server();
    let forged = MockAuth::new("+919876543210").with_secret("not-the-server-secret");

    for value in [
        HeaderValue::from_static("Bearer not-a-jwt"),
        forged.header_value(),
    ] {
        let response = server.get("/auth/me").add_header(AUTHORIZATION, value).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["kind"], "INVALID_TOKEN");
    }
}

#[tokio::test]
async fn send_otp_rejects_malformed_phone() {
    let response = server()
        .post("/auth/send-otp")
        .json(&json!({ "phone": "12345" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "VALIDATION");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let server = server();

    for path in ["/venues/bookings/mine", "/organizer-team/check-permission"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "{path}");
    }
}
