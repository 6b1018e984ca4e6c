//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Coupon errors
//! - 4xxx: Order errors
//! - 5xxx: Courier errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes travel as plain u16 values so the storefront UI can switch on them
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Too many requests from the same client
    RateLimited = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Session bootstrap did not finish in time
    SessionTimeout = 1008,

    // ==================== 2xxx: Permission ====================
    /// Staff role required
    StaffRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Coupon ====================
    /// Coupon code unknown or inactive
    CouponInvalid = 3001,
    /// Coupon past its expiry date
    CouponExpired = 3002,
    /// Coupon start date in the future
    CouponNotYetActive = 3003,
    /// Coupon usage cap reached
    CouponUsageLimitReached = 3004,
    /// Order subtotal below the coupon minimum
    CouponMinimumNotMet = 3005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is empty
    OrderEmpty = 4002,
    /// Phone number does not match the order
    OrderPhoneMismatch = 4003,
    /// Payment amount is invalid
    PaymentInvalidAmount = 4004,
    /// Shipping method missing or inactive
    ShippingMethodInvalid = 4005,
    /// Payment method missing or inactive
    PaymentMethodInvalid = 4006,

    // ==================== 5xxx: Courier ====================
    /// Courier integration not configured or disabled
    CourierNotConfigured = 5001,
    /// Courier API returned an error
    CourierRequestFailed = 5002,
    /// Order has no consignment to track
    CourierConsignmentMissing = 5003,
    /// Order already handed to the courier
    CourierAlreadySent = 5004,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Variant missing, inactive or not part of the product
    VariantUnavailable = 6004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::RateLimited => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => {
                "Your account has been disabled. Please contact support."
            }
            ErrorCode::SessionTimeout => "Authentication timed out. Please refresh the page.",

            // Permission
            ErrorCode::StaffRequired => "Staff role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Coupon
            ErrorCode::CouponInvalid => "Invalid coupon code",
            ErrorCode::CouponExpired => "This coupon has expired",
            ErrorCode::CouponNotYetActive => "This coupon is not active yet",
            ErrorCode::CouponUsageLimitReached => "This coupon has reached its usage limit",
            ErrorCode::CouponMinimumNotMet => "Order total does not meet the coupon minimum",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderPhoneMismatch => "Phone number does not match this order",
            ErrorCode::PaymentInvalidAmount => "Invalid payment amount",
            ErrorCode::ShippingMethodInvalid => "Shipping method is not available",
            ErrorCode::PaymentMethodInvalid => "Payment method is not available",

            // Courier
            ErrorCode::CourierNotConfigured => "Courier integration is not configured",
            ErrorCode::CourierRequestFailed => "Courier request failed",
            ErrorCode::CourierConsignmentMissing => "Order has not been sent to the courier",
            ErrorCode::CourierAlreadySent => "Order has already been sent to the courier",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::VariantUnavailable => "Selected variant is not available",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            6 => ErrorCode::RateLimited,

            1001 => ErrorCode::NotAuthenticated,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,
            1007 => ErrorCode::AccountDisabled,
            1008 => ErrorCode::SessionTimeout,

            2002 => ErrorCode::StaffRequired,
            2003 => ErrorCode::AdminRequired,

            3001 => ErrorCode::CouponInvalid,
            3002 => ErrorCode::CouponExpired,
            3003 => ErrorCode::CouponNotYetActive,
            3004 => ErrorCode::CouponUsageLimitReached,
            3005 => ErrorCode::CouponMinimumNotMet,

            4001 => ErrorCode::OrderNotFound,
            4002 => ErrorCode::OrderEmpty,
            4003 => ErrorCode::OrderPhoneMismatch,
            4004 => ErrorCode::PaymentInvalidAmount,
            4005 => ErrorCode::ShippingMethodInvalid,
            4006 => ErrorCode::PaymentMethodInvalid,

            5001 => ErrorCode::CourierNotConfigured,
            5002 => ErrorCode::CourierRequestFailed,
            5003 => ErrorCode::CourierConsignmentMissing,
            5004 => ErrorCode::CourierAlreadySent,

            6001 => ErrorCode::ProductNotFound,
            6003 => ErrorCode::ProductOutOfStock,
            6004 => ErrorCode::VariantUnavailable,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,

            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AccountDisabled.code(), 1007);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::CouponUsageLimitReached.code(), 3004);
        assert_eq!(ErrorCode::OrderPhoneMismatch.code(), 4003);
        assert_eq!(ErrorCode::CourierNotConfigured.code(), 5001);
        assert_eq!(ErrorCode::VariantUnavailable.code(), 6004);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_round_trips_every_range() {
        for code in [
            ErrorCode::RateLimited,
            ErrorCode::SessionTimeout,
            ErrorCode::StaffRequired,
            ErrorCode::CouponMinimumNotMet,
            ErrorCode::PaymentMethodInvalid,
            ErrorCode::CourierAlreadySent,
            ErrorCode::ProductOutOfStock,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(9999), Err(InvalidErrorCode(9999)));
        assert_eq!(ErrorCode::try_from(7001), Err(InvalidErrorCode(7001)));
        assert_eq!(ErrorCode::try_from(1), Err(InvalidErrorCode(1)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::CouponExpired).unwrap();
        assert_eq!(json, "3002");
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("12345");
        assert!(result.is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::CouponInvalid.message(), "Invalid coupon code");
        assert_eq!(
            ErrorCode::AccountDisabled.message(),
            "Your account has been disabled. Please contact support."
        );
    }
}
