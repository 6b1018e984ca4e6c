//! Request/response types shared between storefront-server and storefront-client
//!
//! Requests derive `validator::Validate`; handlers call `validate()` before
//! touching the database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{
    CourierStatus, DiscountType, OrderItem, OrderStatus, PaymentMethod, PaymentStatus,
    Role, RolePermissions, ShippingMethod, ShippingZone, StoreSettings,
};

// =============================================================================
// Coupon
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponValidateRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(custom(function = "non_negative"))]
    pub subtotal: Decimal,
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(
            ValidationError::new("non_negative").with_message("must not be negative".into())
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponValidateResponse {
    pub valid: bool,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_amount: Decimal,
    pub free_shipping: bool,
}

// =============================================================================
// Checkout
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    /// Explicit variant; otherwise resolved from `size`/`color`
    pub variant_id: Option<Uuid>,
    pub size: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 120))]
    pub customer_name: String,
    #[validate(length(min = 6, max = 20))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 5, max = 500))]
    pub shipping_address: String,
    pub shipping_area: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    pub shipping_method_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub coupon_code: Option<String>,
    #[validate(nested)]
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub shipping_cost: Decimal,
    pub total_amount: Decimal,
}

/// Everything the checkout page needs in one call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOptions {
    pub settings: Option<StoreSettings>,
    pub shipping_methods: Vec<ShippingMethod>,
    pub shipping_zones: Vec<ShippingZone>,
    pub payment_methods: Vec<PaymentMethod>,
}

// =============================================================================
// Order tracking
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrackOrderQuery {
    #[validate(length(min = 1, max = 40))]
    pub order_number: String,
    #[validate(length(min = 6, max = 20))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedOrder {
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub courier_status: CourierStatus,
    pub courier_tracking_code: Option<String>,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub due_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Account
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleInfo {
    pub user_id: Uuid,
    pub role: Role,
    #[serde(flatten)]
    pub permissions: RolePermissions,
}

// =============================================================================
// Wishlist / reviews
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistAddRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewCreateRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

// =============================================================================
// Staff order management
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Record the total amount received so far for an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentUpdate {
    pub paid_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub order_id: Uuid,
    pub payment_status: PaymentStatus,
    pub paid_amount: Decimal,
    pub due_amount: Decimal,
}

// =============================================================================
// Conversions relay
// =============================================================================

/// Shopper identifiers; the relay hashes `email`, `phone` and `external_id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapiUserData {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub external_id: Option<String>,
    pub client_ip_address: Option<String>,
    pub client_user_agent: Option<String>,
    /// Browser cookie ids, forwarded unchanged
    pub fbp: Option<String>,
    pub fbc: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CapiEventRequest {
    #[validate(length(min = 1, max = 64))]
    pub event_name: String,
    /// Deduplication id shared with the browser pixel
    pub event_id: Option<String>,
    pub event_source_url: Option<String>,
    #[serde(default)]
    pub user_data: CapiUserData,
    pub custom_data: Option<serde_json::Value>,
    #[serde(default)]
    pub test_mode: bool,
}

/// Always returned with HTTP 200
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapiRelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CapiRelayResponse {
    pub fn sent() -> Self {
        Self {
            success: true,
            skipped: None,
            reason: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            success: true,
            skipped: Some(true),
            reason: Some(reason.into()),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            skipped: None,
            reason: Some(reason.into()),
        }
    }
}

// =============================================================================
// Courier relay
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CourierRequest {
    TestConnection,
    CreateParcel { order_id: Uuid },
    TrackStatus { order_id: Uuid },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consignment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_status: Option<CourierStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courier_request_tagged_by_action() {
        let req: CourierRequest = serde_json::from_str(r#"{"action":"test_connection"}"#).unwrap();
        assert!(matches!(req, CourierRequest::TestConnection));

        let id = Uuid::new_v4();
        let json = format!(r#"{{"action":"track_status","order_id":"{id}"}}"#);
        let req: CourierRequest = serde_json::from_str(&json).unwrap();
        assert!(matches!(req, CourierRequest::TrackStatus { order_id } if order_id == id));
    }

    #[test]
    fn test_capi_skipped_body() {
        let json = serde_json::to_value(CapiRelayResponse::skipped("not configured")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "skipped": true, "reason": "not configured"})
        );
        let json = serde_json::to_value(CapiRelayResponse::sent()).unwrap();
        assert_eq!(json, serde_json::json!({"success": true}));
    }

    #[test]
    fn test_coupon_subtotal_must_not_be_negative() {
        let req = |subtotal: i64| CouponValidateRequest {
            code: "SAVE10".into(),
            subtotal: Decimal::from(subtotal),
        };
        assert!(req(0).validate().is_ok());
        assert!(req(1500).validate().is_ok());
        let errors = req(-1).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("subtotal"));
    }

    #[test]
    fn test_review_rating_range() {
        let ok = ReviewCreateRequest { rating: 5, comment: None };
        assert!(ok.validate().is_ok());
        let bad = ReviewCreateRequest { rating: 6, comment: None };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_checkout_item_quantity_validated() {
        let req = CheckoutRequest {
            customer_name: "Rahim".into(),
            phone: "01712345678".into(),
            email: Some("not-an-email".into()),
            shipping_address: "House 1, Road 2".into(),
            shipping_area: None,
            notes: None,
            shipping_method_id: Uuid::nil(),
            payment_method_id: None,
            coupon_code: None,
            items: vec![CheckoutItem {
                product_id: Uuid::nil(),
                variant_id: None,
                size: None,
                color: None,
                quantity: 0,
            }],
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("items"));
    }

    #[test]
    fn test_capi_test_mode_defaults_false() {
        let req: CapiEventRequest =
            serde_json::from_str(r#"{"event_name":"PageView"}"#).unwrap();
        assert!(!req.test_mode);
        assert!(req.user_data.email.is_none());
    }
}
