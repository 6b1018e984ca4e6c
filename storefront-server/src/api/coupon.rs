//! Coupon validation (no redemption)

use axum::{Json, extract::State};
use chrono::Utc;
use shared::client::{CouponValidateRequest, CouponValidateResponse};
use shared::error::AppError;
use validator::Validate;

use crate::services::checkout::apply_coupon;
use crate::state::AppState;

use super::ApiResult;

/// POST /api/coupons/validate
pub async fn validate_coupon(
    State(state): State<AppState>,
    Json(req): Json<CouponValidateRequest>,
) -> ApiResult<CouponValidateResponse> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let (coupon, outcome) = apply_coupon(&state, Some(&req.code), req.subtotal, Utc::now())
        .await?
        .ok_or_else(|| AppError::validation("Coupon code is required"))?;

    Ok(Json(CouponValidateResponse {
        valid: true,
        code: coupon.code,
        discount_type: coupon.discount_type,
        discount_amount: outcome.discount_amount,
        free_shipping: outcome.free_shipping,
    }))
}
