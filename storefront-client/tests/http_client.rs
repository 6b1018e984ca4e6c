use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use shared::error::ErrorCode;
use storefront_client::{ClientConfig, ClientError, Role};
use uuid::Uuid;

const USER: &str = "5b0f7d1e-8f7c-4d6b-9a3e-2c1d0e9f8a7b";

async fn spawn_server() -> String {
    let router = Router::new()
        .route(
            "/api/account/role",
            get(|headers: HeaderMap| async move {
                match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                    Some("Bearer good") => (
                        StatusCode::OK,
                        Json(json!({
                            "user_id": USER,
                            "role": "manager",
                            "is_admin": false,
                            "is_staff": true
                        })),
                    ),
                    _ => (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"code": 1001, "message": "User is not authenticated"})),
                    ),
                }
            }),
        )
        .route(
            "/api/orders/track",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                if q.get("phone").map(String::as_str) == Some("01712345678") {
                    (
                        StatusCode::NOT_FOUND,
                        Json(json!({"code": 4001, "message": "Order not found"})),
                    )
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "code": 4003,
                            "message": "Phone number does not match this order"
                        })),
                    )
                }
            }),
        )
        .route(
            "/api/coupons/validate",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({"code": 3002, "message": "This coupon has expired"})),
                )
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn test_role_with_token() {
    let base = spawn_server().await;
    let client = ClientConfig::new(base).with_token("good").build_http_client().unwrap();
    let info = client.role().await.unwrap();
    assert_eq!(info.role, Role::Manager);
    assert!(info.permissions.is_staff);
    assert_eq!(info.user_id, Uuid::parse_str(USER).unwrap());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let base = spawn_server().await;
    let client = ClientConfig::new(base).build_http_client().unwrap();
    let err = client.role().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(err.code(), Some(ErrorCode::NotAuthenticated));
}

#[tokio::test]
async fn test_error_envelope_code_and_message() {
    let base = spawn_server().await;
    let client = ClientConfig::new(base).build_http_client().unwrap();

    match client.track_order("ORD-20261018-0001", "01712345678").await.unwrap_err() {
        ClientError::NotFound(message) => assert_eq!(message, "Order not found"),
        other => panic!("unexpected error: {other}"),
    }

    let err = client.track_order("ORD-20261018-0001", "01800000000").await.unwrap_err();
    assert_eq!(err.code().map(|c| c.code()), Some(4003));

    let err = client
        .validate_coupon(&shared::client::CouponValidateRequest {
            code: "SAVE10".into(),
            subtotal: rust_decimal::Decimal::from(500),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { code: ErrorCode::CouponExpired, .. }));
}
