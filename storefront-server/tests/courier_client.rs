use axum::extract::Path;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use storefront_server::courier::{
    self, CourierApiError, CourierCredentials, ParcelRequest,
};

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("Api-Key").and_then(|v| v.to_str().ok()) == Some("key")
        && headers.get("Secret-Key").and_then(|v| v.to_str().ok()) == Some("secret")
}

async fn spawn_courier() -> String {
    let router = Router::new()
        .route(
            "/get_balance",
            get(|headers: HeaderMap| async move {
                if authorized(&headers) {
                    Json(json!({"status": 200, "current_balance": 1520.5}))
                } else {
                    Json(json!({"status": 401, "message": "Unauthorized"}))
                }
            }),
        )
        .route(
            "/create_order",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "status": 200,
                    "message": "Consignment has been created successfully.",
                    "consignment": {
                        "consignment_id": 1424107,
                        "invoice": body["invoice"],
                        "tracking_code": "15BAEB8A",
                        "cod_amount": body["cod_amount"],
                        "status": "in_review"
                    }
                }))
            }),
        )
        .route(
            "/status_by_cid/{cid}",
            get(|Path(cid): Path<String>| async move {
                if cid == "1424107" {
                    Json(json!({"status": 200, "delivery_status": "delivered"}))
                } else {
                    Json(json!({"status": 404, "message": "Consignment not found"}))
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn creds(base_url: String, api_key: &str) -> CourierCredentials {
    CourierCredentials {
        base_url,
        api_key: api_key.into(),
        secret_key: "secret".into(),
    }
}

#[tokio::test]
async fn test_balance_with_valid_credentials() {
    let base = spawn_courier().await;
    let http = reqwest::Client::new();
    let (balance, raw) = courier::get_balance(&http, &creds(base, "key")).await.unwrap();
    assert_eq!(balance, Decimal::new(15205, 1));
    assert_eq!(raw["status"], 200);
}

#[tokio::test]
async fn test_balance_rejected_in_body_status() {
    let base = spawn_courier().await;
    let http = reqwest::Client::new();
    let err = courier::get_balance(&http, &creds(base, "wrong"))
        .await
        .unwrap_err();
    match &err {
        CourierApiError::Rejected { status, message, .. } => {
            assert_eq!(*status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.body().is_some());
}

#[tokio::test]
async fn test_create_order_returns_consignment() {
    let base = spawn_courier().await;
    let http = reqwest::Client::new();
    let parcel = ParcelRequest {
        invoice: "ORD-20261018-0042".into(),
        recipient_name: "Rahim Uddin".into(),
        recipient_phone: "01712345678".into(),
        recipient_address: "House 12, Road 5, Dhanmondi".into(),
        cod_amount: Decimal::from(1560),
        note: None,
    };
    let (consignment, raw) = courier::create_order(&http, &creds(base, "key"), &parcel)
        .await
        .unwrap();
    assert_eq!(consignment.consignment_id().as_deref(), Some("1424107"));
    assert_eq!(consignment.tracking_code.as_deref(), Some("15BAEB8A"));
    assert_eq!(consignment.status.as_deref(), Some("in_review"));
    assert_eq!(raw["consignment"]["invoice"], "ORD-20261018-0042");
}

#[tokio::test]
async fn test_status_lookup() {
    let base = spawn_courier().await;
    let http = reqwest::Client::new();
    let (status, _) = courier::status_by_consignment(&http, &creds(base.clone(), "key"), "1424107")
        .await
        .unwrap();
    assert_eq!(status.as_deref(), Some("delivered"));

    let err = courier::status_by_consignment(&http, &creds(base, "key"), "missing")
        .await
        .unwrap_err();
    assert!(matches!(err, CourierApiError::Rejected { status: 404, .. }));
}

#[tokio::test]
async fn test_unreachable_courier_is_http_error() {
    let http = reqwest::Client::new();
    let err = courier::get_balance(&http, &creds("http://127.0.0.1:1".into(), "key"))
        .await
        .unwrap_err();
    assert!(matches!(err, CourierApiError::Http(_)));
}
