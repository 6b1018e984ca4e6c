//! Store configuration models (settings, shipping, payment)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single-row store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StoreSettings {
    pub store_name: String,
    pub currency: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    /// Orders with a subtotal at or above this ship free
    pub free_shipping_threshold: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShippingMethod {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub cost: Decimal,
    pub estimated_days: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Delivery area with its own charge, overriding the method cost
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShippingZone {
    pub id: Uuid,
    pub name: String,
    /// Area names (district/city) covered by this zone
    pub areas: Vec<String>,
    pub charge: Decimal,
    pub is_active: bool,
}

impl ShippingZone {
    pub fn covers(&self, area: &str) -> bool {
        let area = area.trim();
        self.is_active && self.areas.iter().any(|a| a.trim().eq_ignore_ascii_case(area))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentMethod {
    pub id: Uuid,
    pub name: String,
    /// Wallet/account number shown to the shopper for manual payments
    pub account_number: Option<String>,
    pub instructions: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Resolve the shipping fee for a checkout.
///
/// Order of precedence: a free-shipping coupon or the store threshold waives
/// the fee; otherwise a zone covering the area sets it; otherwise the
/// method's cost applies.
pub fn shipping_fee(
    method: &ShippingMethod,
    zones: &[ShippingZone],
    area: Option<&str>,
    subtotal: Decimal,
    free_shipping_threshold: Option<Decimal>,
    free_shipping_coupon: bool,
) -> Decimal {
    if free_shipping_coupon {
        return Decimal::ZERO;
    }
    if let Some(threshold) = free_shipping_threshold
        && threshold > Decimal::ZERO
        && subtotal >= threshold
    {
        return Decimal::ZERO;
    }
    area.and_then(|a| zones.iter().find(|z| z.covers(a)))
        .map(|z| z.charge)
        .unwrap_or(method.cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method() -> ShippingMethod {
        ShippingMethod {
            id: Uuid::nil(),
            name: "Home delivery".into(),
            description: None,
            cost: Decimal::from(120),
            estimated_days: Some("3-5".into()),
            is_active: true,
            sort_order: 0,
        }
    }

    fn dhaka() -> ShippingZone {
        ShippingZone {
            id: Uuid::nil(),
            name: "Inside Dhaka".into(),
            areas: vec!["Dhaka".into(), "Gazipur".into()],
            charge: Decimal::from(60),
            is_active: true,
        }
    }

    #[test]
    fn test_zone_overrides_method_cost() {
        let subtotal = Decimal::from(500);
        let fee = shipping_fee(&method(), &[dhaka()], Some(" dhaka "), subtotal, None, false);
        assert_eq!(fee, Decimal::from(60));
    }

    #[test]
    fn test_unknown_area_uses_method_cost() {
        let subtotal = Decimal::from(500);
        let fee = shipping_fee(&method(), &[dhaka()], Some("Sylhet"), subtotal, None, false);
        assert_eq!(fee, Decimal::from(120));
        let fee = shipping_fee(&method(), &[dhaka()], None, subtotal, None, false);
        assert_eq!(fee, Decimal::from(120));
    }

    #[test]
    fn test_free_shipping_coupon_and_threshold() {
        let subtotal = Decimal::from(500);
        let fee = shipping_fee(&method(), &[dhaka()], Some("Dhaka"), subtotal, None, true);
        assert_eq!(fee, Decimal::ZERO);

        let threshold = Some(Decimal::from(3000));
        let below = shipping_fee(&method(), &[], None, Decimal::from(2999), threshold, false);
        let at = shipping_fee(&method(), &[], None, Decimal::from(3000), threshold, false);
        assert_eq!(below, Decimal::from(120));
        assert_eq!(at, Decimal::ZERO);
    }

    #[test]
    fn test_inactive_zone_ignored() {
        let mut zone = dhaka();
        zone.is_active = false;
        let subtotal = Decimal::from(500);
        let fee = shipping_fee(&method(), &[zone], Some("Dhaka"), subtotal, None, false);
        assert_eq!(fee, Decimal::from(120));
    }
}
