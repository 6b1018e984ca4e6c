//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product entity (read-only catalog view used for pricing)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    /// Discounted price shown instead of `price` when present
    pub sale_price: Option<Decimal>,
    pub is_active: bool,
}

impl Product {
    /// Price a shopper pays before variant adjustments
    pub fn effective_price(&self) -> Decimal {
        match self.sale_price {
            Some(sale) if sale > Decimal::ZERO && sale < self.price => sale,
            _ => self.price,
        }
    }
}

/// Size/color variant (`product_variants` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub size: Option<String>,
    pub color: Option<String>,
    pub stock: i32,
    pub price_adjustment: Decimal,
    pub is_active: bool,
}

impl ProductVariant {
    /// A variant can be picked only while active and in stock
    pub fn is_selectable(&self) -> bool {
        self.is_active && self.stock > 0
    }

    pub fn unit_price(&self, product: &Product) -> Decimal {
        product.effective_price() + self.price_adjustment
    }
}

fn same_option(value: Option<&str>, wanted: Option<&str>) -> bool {
    match (value, wanted) {
        (_, None) => true,
        (Some(v), Some(w)) => v.eq_ignore_ascii_case(w),
        (None, Some(_)) => false,
    }
}

/// Find the selectable variant matching the chosen size and color.
///
/// A `None` choice matches any value for that option.
pub fn find_variant<'a>(
    variants: &'a [ProductVariant],
    size: Option<&str>,
    color: Option<&str>,
) -> Option<&'a ProductVariant> {
    variants.iter().find(|v| {
        v.is_selectable()
            && same_option(v.size.as_deref(), size)
            && same_option(v.color.as_deref(), color)
    })
}

/// Distinct sizes that have at least one selectable variant, in catalog order
pub fn available_sizes(variants: &[ProductVariant]) -> Vec<String> {
    let mut sizes: Vec<String> = Vec::new();
    for size in variants
        .iter()
        .filter(|v| v.is_selectable())
        .filter_map(|v| v.size.clone())
    {
        if !sizes.contains(&size) {
            sizes.push(size);
        }
    }
    sizes
}

/// Distinct colors selectable for the given size
pub fn available_colors(variants: &[ProductVariant], size: Option<&str>) -> Vec<String> {
    let mut colors: Vec<String> = Vec::new();
    for color in variants
        .iter()
        .filter(|v| v.is_selectable() && same_option(v.size.as_deref(), size))
        .filter_map(|v| v.color.clone())
    {
        if !colors.contains(&color) {
            colors.push(color);
        }
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(size: &str, color: &str, stock: i32, is_active: bool) -> ProductVariant {
        ProductVariant {
            id: Uuid::new_v4(),
            product_id: Uuid::nil(),
            size: Some(size.to_string()),
            color: Some(color.to_string()),
            stock,
            price_adjustment: Decimal::ZERO,
            is_active,
        }
    }

    #[test]
    fn test_out_of_stock_or_inactive_not_selectable() {
        assert!(variant("M", "Red", 3, true).is_selectable());
        assert!(!variant("M", "Red", 0, true).is_selectable());
        assert!(!variant("M", "Red", 3, false).is_selectable());
    }

    #[test]
    fn test_find_variant_skips_unselectable() {
        let variants = vec![
            variant("M", "Red", 0, true),
            variant("M", "Blue", 2, true),
            variant("L", "Red", 5, false),
        ];

        assert!(find_variant(&variants, Some("M"), Some("Red")).is_none());
        assert!(find_variant(&variants, Some("L"), Some("Red")).is_none());
        let found = find_variant(&variants, Some("m"), Some("blue")).unwrap();
        assert_eq!(found.color.as_deref(), Some("Blue"));
    }

    #[test]
    fn test_available_options() {
        let variants = vec![
            variant("S", "Red", 1, true),
            variant("M", "Red", 0, true),
            variant("M", "Black", 4, true),
            variant("S", "Black", 2, true),
        ];
        assert_eq!(available_sizes(&variants), vec!["S", "M"]);
        assert_eq!(available_colors(&variants, Some("M")), vec!["Black"]);
        assert_eq!(available_colors(&variants, None), vec!["Red", "Black"]);
    }

    #[test]
    fn test_unit_price_uses_sale_price_and_adjustment() {
        let product = Product {
            id: Uuid::nil(),
            name: "Tee".into(),
            slug: "tee".into(),
            price: Decimal::from(800),
            sale_price: Some(Decimal::from(650)),
            is_active: true,
        };
        let mut v = variant("XL", "Red", 1, true);
        v.price_adjustment = Decimal::from(50);
        assert_eq!(v.unit_price(&product), Decimal::from(700));
    }
}
