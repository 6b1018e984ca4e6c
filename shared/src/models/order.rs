//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fulfilment status of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "order_status", rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Delivery status as last reported by the courier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "courier_status", rename_all = "snake_case"))]
pub enum CourierStatus {
    /// Not handed to the courier yet, or the courier never reported a status
    #[default]
    Created,
    Pending,
    InTransit,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "payment_status", rename_all = "snake_case"))]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    /// Derive the payment status from amounts paid against the order total
    pub fn from_amounts(total: Decimal, paid: Decimal) -> Self {
        if paid <= Decimal::ZERO {
            PaymentStatus::Unpaid
        } else if paid >= total {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        }
    }
}

/// Order entity (`orders` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: Uuid,
    /// Human-facing number printed on receipts, e.g. `ORD-20260118-4821`
    pub order_number: String,
    /// `None` for guest checkout
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub shipping_address: String,
    pub shipping_area: Option<String>,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method_id: Option<Uuid>,
    pub shipping_method_id: Option<Uuid>,
    pub coupon_code: Option<String>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub shipping_cost: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub due_amount: Decimal,
    pub courier_status: CourierStatus,
    pub courier_consignment_id: Option<String>,
    pub courier_tracking_code: Option<String>,
    pub courier_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line (`order_items` table), a snapshot taken at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_from_amounts() {
        let total = Decimal::from(1200);
        assert_eq!(
            PaymentStatus::from_amounts(total, Decimal::ZERO),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            PaymentStatus::from_amounts(total, Decimal::from(200)),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentStatus::from_amounts(total, Decimal::from(1200)),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&CourierStatus::InTransit).unwrap(),
            "\"in_transit\""
        );
        let status: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(status, OrderStatus::Shipped);
    }
}
