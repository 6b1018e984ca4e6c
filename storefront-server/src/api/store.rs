//! Public store configuration

use axum::{Json, extract::State};
use shared::client::CheckoutOptions;
use shared::error::AppError;
use shared::models::StoreSettings;

use crate::db::store;
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/store/settings
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<StoreSettings> {
    let settings = store::get_settings(&state.pool)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::not_found("Store settings"))?;
    Ok(Json(settings))
}

/// GET /api/store/checkout-options
pub async fn checkout_options(State(state): State<AppState>) -> ApiResult<CheckoutOptions> {
    let (settings, shipping_methods, shipping_zones, payment_methods) = tokio::try_join!(
        store::get_settings(&state.pool),
        store::list_shipping_methods(&state.pool),
        store::list_shipping_zones(&state.pool),
        store::list_payment_methods(&state.pool),
    )
    .map_err(ServiceError::from)?;

    Ok(Json(CheckoutOptions {
        settings,
        shipping_methods,
        shipping_zones,
        payment_methods,
    }))
}
