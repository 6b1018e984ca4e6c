//! Courier delivery-status mapping
//!
//! Carriers report free-form status strings (`in_review`, `out_for_delivery`,
//! `partial_delivered`, ...). The storefront only tracks five coarse states,
//! so everything unknown but non-empty counts as in transit.

use crate::models::order::{CourierStatus, OrderStatus};

/// Map a raw carrier status to the internal courier status.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
/// Returns `None` for an empty string; the caller keeps its current status.
pub fn map_delivery_status(raw: &str) -> Option<CourierStatus> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let status = match raw.to_ascii_lowercase().as_str() {
        "delivered" => CourierStatus::Delivered,
        "cancelled" => CourierStatus::Cancelled,
        "pending" | "in_review" => CourierStatus::Pending,
        _ => CourierStatus::InTransit,
    };
    Some(status)
}

/// Apply a possibly-absent carrier status on top of `current`
pub fn apply_delivery_status(raw: Option<&str>, current: CourierStatus) -> CourierStatus {
    raw.and_then(map_delivery_status).unwrap_or(current)
}

impl CourierStatus {
    /// Order status the caller should write alongside this courier status.
    ///
    /// `Delivered` completes the order, `InTransit` marks it shipped; the rest
    /// leave the order status alone.
    pub fn order_status_effect(self) -> Option<OrderStatus> {
        match self {
            CourierStatus::Delivered => Some(OrderStatus::Delivered),
            CourierStatus::InTransit => Some(OrderStatus::Shipped),
            CourierStatus::Created | CourierStatus::Pending | CourierStatus::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        for raw in ["Delivered", "DELIVERED", "delivered", " delivered "] {
            assert_eq!(map_delivery_status(raw), Some(CourierStatus::Delivered));
        }
        assert_eq!(map_delivery_status("CANCELLED"), Some(CourierStatus::Cancelled));
    }

    #[test]
    fn test_in_review_is_pending() {
        assert_eq!(map_delivery_status("in_review"), Some(CourierStatus::Pending));
        assert_eq!(map_delivery_status("Pending"), Some(CourierStatus::Pending));
        assert_eq!(CourierStatus::Pending.order_status_effect(), None);
    }

    #[test]
    fn test_out_for_delivery_ships_order() {
        let status = map_delivery_status("out_for_delivery").unwrap();
        assert_eq!(status, CourierStatus::InTransit);
        assert_eq!(status.order_status_effect(), Some(OrderStatus::Shipped));
    }

    #[test]
    fn test_unknown_values_are_in_transit() {
        for raw in ["partial_delivered", "hold", "unknown", "delivered_approval_pending"] {
            assert_eq!(map_delivery_status(raw), Some(CourierStatus::InTransit));
        }
    }

    #[test]
    fn test_absent_or_empty_keeps_current() {
        assert_eq!(map_delivery_status(""), None);
        assert_eq!(map_delivery_status("   "), None);
        assert_eq!(
            apply_delivery_status(None, CourierStatus::Created),
            CourierStatus::Created
        );
        assert_eq!(
            apply_delivery_status(Some(""), CourierStatus::Pending),
            CourierStatus::Pending
        );
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let once = apply_delivery_status(Some("Delivered"), CourierStatus::Created);
        let twice = apply_delivery_status(Some("Delivered"), once);
        assert_eq!(once, twice);
        assert_eq!(once.order_status_effect(), Some(OrderStatus::Delivered));
    }
}
