//! Checkout endpoint

use axum::{Json, extract::State};
use shared::client::{CheckoutRequest, CheckoutResponse};
use shared::error::AppError;
use validator::Validate;

use crate::auth::MaybeUser;
use crate::services::checkout;
use crate::state::AppState;

use super::ApiResult;

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<CheckoutResponse> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let response = checkout::place_order(&state, user.map(|u| u.id), &req).await?;
    Ok(Json(response))
}
