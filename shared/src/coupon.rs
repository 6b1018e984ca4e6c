//! Coupon evaluation
//!
//! Pure function of the coupon record, the cart subtotal and the caller's
//! clock. Fetching the record and incrementing `used_count` belong to the
//! caller.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::coupon::{Coupon, DiscountType};

/// Monetary precision for discount amounts
const DECIMAL_PLACES: u32 = 2;

/// Result of a successful evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponOutcome {
    pub discount_amount: Decimal,
    /// Set for `free_shipping` coupons; checkout waives the shipping fee
    pub free_shipping: bool,
}

/// Why a coupon cannot be applied. The first failing check wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("Invalid coupon code")]
    Inactive,
    #[error("This coupon has expired")]
    Expired { expires_at: DateTime<Utc> },
    #[error("This coupon is not active yet")]
    NotYetActive { starts_at: DateTime<Utc> },
    #[error("This coupon has reached its usage limit")]
    UsageLimitReached { max_uses: i32 },
    #[error("Minimum order amount of {min_order_amount} required")]
    MinimumNotMet { min_order_amount: Decimal },
}

impl From<CouponError> for AppError {
    fn from(err: CouponError) -> Self {
        let message = err.to_string();
        match err {
            CouponError::Inactive => AppError::new(ErrorCode::CouponInvalid),
            CouponError::Expired { expires_at } => {
                AppError::with_message(ErrorCode::CouponExpired, message)
                    .with_detail("expires_at", expires_at.to_rfc3339())
            }
            CouponError::NotYetActive { starts_at } => {
                AppError::with_message(ErrorCode::CouponNotYetActive, message)
                    .with_detail("starts_at", starts_at.to_rfc3339())
            }
            CouponError::UsageLimitReached { max_uses } => {
                AppError::with_message(ErrorCode::CouponUsageLimitReached, message)
                    .with_detail("max_uses", max_uses)
            }
            CouponError::MinimumNotMet { min_order_amount } => {
                AppError::with_message(ErrorCode::CouponMinimumNotMet, message)
                    .with_detail("min_order_amount", min_order_amount.to_string())
            }
        }
    }
}

/// Canonical form used for lookups: trimmed, upper-cased
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Validate `coupon` against `subtotal` at `now` and compute the discount.
///
/// Checks run in this order: active flag, expiry, start date, usage cap,
/// minimum order. Fixed discounts are not capped at the subtotal.
pub fn evaluate(
    coupon: &Coupon,
    subtotal: Decimal,
    now: DateTime<Utc>,
) -> Result<CouponOutcome, CouponError> {
    if !coupon.is_active {
        return Err(CouponError::Inactive);
    }

    if let Some(expires_at) = coupon.expires_at
        && expires_at < now
    {
        return Err(CouponError::Expired { expires_at });
    }

    if let Some(starts_at) = coupon.starts_at
        && starts_at > now
    {
        return Err(CouponError::NotYetActive { starts_at });
    }

    if let Some(max_uses) = coupon.max_uses
        && coupon.used_count >= max_uses
    {
        return Err(CouponError::UsageLimitReached { max_uses });
    }

    let min_order_amount = coupon.min_order_amount.unwrap_or(Decimal::ZERO);
    if subtotal < min_order_amount {
        return Err(CouponError::MinimumNotMet { min_order_amount });
    }

    let outcome = match coupon.discount_type {
        DiscountType::Percentage => CouponOutcome {
            discount_amount: (subtotal * coupon.discount_value / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
            free_shipping: false,
        },
        DiscountType::Fixed => CouponOutcome {
            discount_amount: coupon.discount_value,
            free_shipping: false,
        },
        DiscountType::FreeShipping => CouponOutcome {
            discount_amount: Decimal::ZERO,
            free_shipping: true,
        },
    };

    Ok(outcome)
}
