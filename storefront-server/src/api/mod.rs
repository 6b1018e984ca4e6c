//! HTTP routes for storefront-server

pub mod account;
pub mod admin_orders;
pub mod capi_relay;
pub mod catalog;
pub mod checkout;
pub mod coupon;
pub mod courier_relay;
pub mod health;
pub mod reviews;
pub mod store;
pub mod tracking;
pub mod wishlist;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};
use axum::{Router, middleware};
use http::{HeaderValue, Method};
use shared::error::AppError;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::{coupon_rate_limit, tracking_rate_limit};
use crate::auth::{require_admin, require_staff};
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState, cors_allowed_origin: Option<&str>) -> Router {
    let public = Router::new()
        .route("/api/store/settings", get(store::get_settings))
        .route("/api/store/checkout-options", get(store::checkout_options))
        .route("/api/products/{id}/variants", get(catalog::list_variants))
        .route(
            "/api/products/{id}/reviews",
            get(reviews::list).post(reviews::create),
        )
        .route("/api/orders", post(checkout::create_order));

    let coupon = Router::new()
        .route("/api/coupons/validate", post(coupon::validate_coupon))
        .layer(middleware::from_fn_with_state(state.clone(), coupon_rate_limit));

    let tracking = Router::new()
        .route("/api/orders/track", get(tracking::track_order))
        .layer(middleware::from_fn_with_state(state.clone(), tracking_rate_limit));

    // Bearer token required (checked by the CurrentUser extractor)
    let account = Router::new()
        .route("/api/account/profile", get(account::get_profile))
        .route("/api/account/role", get(account::get_role))
        .route("/api/wishlist", get(wishlist::list).post(wishlist::add))
        .route("/api/wishlist/{product_id}", delete(wishlist::remove));

    let staff = Router::new()
        .route("/api/admin/orders/{id}/status", patch(admin_orders::update_status))
        .route("/api/admin/orders/{id}/payment", patch(admin_orders::update_payment))
        .layer(middleware::from_fn_with_state(state.clone(), require_staff));

    let functions = Router::new()
        .route("/functions/v1/capi-relay", post(capi_relay::relay_event))
        .merge(
            Router::new()
                .route("/functions/v1/courier", post(courier_relay::handle))
                .layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(coupon)
        .merge(tracking)
        .merge(account)
        .merge(staff)
        .merge(functions)
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(TimeoutLayer::with_status_code(
            http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer(cors_allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin.and_then(|o| o.parse::<HeaderValue>().ok()) {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
