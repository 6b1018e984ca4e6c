//! Coupon Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a coupon reduces the order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "discount_type", rename_all = "snake_case"))]
pub enum DiscountType {
    /// `discount_value` is a percentage of the subtotal (10 = 10%)
    Percentage,
    /// `discount_value` is an absolute amount
    Fixed,
    /// Shipping fee is waived, no amount is deducted from the subtotal
    FreeShipping,
}

/// Coupon entity (`coupons` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: Uuid,
    /// Stored upper-cased, unique
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_order_amount: Option<Decimal>,
    /// `None` = unlimited
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
