//! Checkout: price the cart from the catalog, apply the coupon and shipping
//! fee, then persist everything in one transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use shared::client::{CheckoutItem, CheckoutRequest, CheckoutResponse};
use shared::coupon::{self, CouponOutcome};
use shared::error::{AppError, ErrorCode};
use shared::models::{Coupon, Product, ProductVariant, find_variant, shipping_fee};
use uuid::Uuid;

use crate::db::{catalog, coupons, orders, store};
use crate::error::ServiceResult;
use crate::state::AppState;

/// One cart line priced against the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Resolve each cart item to a product and, when the product has variants,
/// a selectable variant with enough stock.
pub fn price_lines(
    items: &[CheckoutItem],
    products: &[Product],
    variants: &[ProductVariant],
) -> Result<Vec<PricedLine>, AppError> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let products: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        let product = products
            .get(&item.product_id)
            .filter(|p| p.is_active)
            .ok_or_else(|| {
                AppError::new(ErrorCode::ProductNotFound)
                    .with_detail("product_id", item.product_id.to_string())
            })?;

        let product_variants: Vec<ProductVariant> = variants
            .iter()
            .filter(|v| v.product_id == product.id)
            .cloned()
            .collect();

        let line = if product_variants.is_empty() {
            PricedLine {
                product_id: product.id,
                variant_id: None,
                product_name: product.name.clone(),
                size: None,
                color: None,
                quantity: item.quantity,
                unit_price: product.effective_price(),
                line_total: product.effective_price() * Decimal::from(item.quantity),
            }
        } else {
            let variant = match item.variant_id {
                Some(id) => product_variants
                    .iter()
                    .find(|v| v.id == id && v.is_selectable()),
                None => find_variant(
                    &product_variants,
                    item.size.as_deref(),
                    item.color.as_deref(),
                ),
            }
            .ok_or_else(|| {
                AppError::new(ErrorCode::VariantUnavailable)
                    .with_detail("product_id", product.id.to_string())
            })?;

            if variant.stock < item.quantity {
                return Err(AppError::with_message(
                    ErrorCode::ProductOutOfStock,
                    format!("Only {} left of {}", variant.stock, product.name),
                )
                .with_detail("variant_id", variant.id.to_string())
                .with_detail("available", variant.stock));
            }

            let unit_price = variant.unit_price(product);
            PricedLine {
                product_id: product.id,
                variant_id: Some(variant.id),
                product_name: product.name.clone(),
                size: variant.size.clone(),
                color: variant.color.clone(),
                quantity: item.quantity,
                unit_price,
                line_total: unit_price * Decimal::from(item.quantity),
            }
        };
        lines.push(line);
    }

    Ok(lines)
}

/// Totals for a priced cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub shipping_cost: Decimal,
    pub total_amount: Decimal,
}

impl Totals {
    /// Fixed discounts are not capped, so `total_amount` can be negative
    pub fn new(subtotal: Decimal, discount_amount: Decimal, shipping_cost: Decimal) -> Self {
        Self {
            subtotal,
            discount_amount,
            shipping_cost,
            total_amount: subtotal - discount_amount + shipping_cost,
        }
    }
}

/// Attempts at drawing an unused order number
const ORDER_NUMBER_ATTEMPTS: u32 = 5;

/// Whether a failed order insert should be retried with a fresh order number
pub fn retry_order_number(err: &sqlx::Error, attempt: u32) -> bool {
    if attempt >= ORDER_NUMBER_ATTEMPTS {
        return false;
    }
    match err {
        sqlx::Error::Database(db) => {
            db.is_unique_violation()
                && db.constraint().is_none_or(|c| c == "orders_order_number_key")
        }
        _ => false,
    }
}

/// Fetch and evaluate a coupon code; blank codes mean no coupon
pub async fn apply_coupon(
    state: &AppState,
    code: Option<&str>,
    subtotal: Decimal,
    now: DateTime<Utc>,
) -> ServiceResult<Option<(Coupon, CouponOutcome)>> {
    let Some(code) = code.map(coupon::normalize_code).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    let found = coupons::find_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CouponInvalid).with_detail("code", code.clone()))?;
    let outcome = coupon::evaluate(&found, subtotal, now)?;
    Ok(Some((found, outcome)))
}

/// Place an order for `req`; `user_id` is `None` for guest checkout
pub async fn place_order(
    state: &AppState,
    user_id: Option<Uuid>,
    req: &CheckoutRequest,
) -> ServiceResult<CheckoutResponse> {
    let now = Utc::now();

    let product_ids: Vec<Uuid> = req.items.iter().map(|i| i.product_id).collect();
    let products = catalog::find_products(&state.pool, &product_ids).await?;
    let variants = catalog::list_variants(&state.pool, &product_ids).await?;
    let lines = price_lines(&req.items, &products, &variants)?;
    let subtotal: Decimal = lines.iter().map(|l| l.line_total).sum();

    let applied = apply_coupon(state, req.coupon_code.as_deref(), subtotal, now).await?;
    let (discount_amount, free_shipping) = applied
        .as_ref()
        .map(|(_, o)| (o.discount_amount, o.free_shipping))
        .unwrap_or((Decimal::ZERO, false));

    let method = store::find_shipping_method(&state.pool, req.shipping_method_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShippingMethodInvalid))?;
    if let Some(payment_method_id) = req.payment_method_id
        && !store::payment_method_exists(&state.pool, payment_method_id).await?
    {
        return Err(AppError::new(ErrorCode::PaymentMethodInvalid).into());
    }
    let zones = store::list_shipping_zones(&state.pool).await?;
    let threshold = store::get_settings(&state.pool)
        .await?
        .and_then(|s| s.free_shipping_threshold);
    let shipping_cost = shipping_fee(
        &method,
        &zones,
        req.shipping_area.as_deref(),
        subtotal,
        threshold,
        free_shipping,
    );
    let totals = Totals::new(subtotal, discount_amount, shipping_cost);

    let coupon_code = applied.as_ref().map(|(c, _)| c.code.clone());

    let mut tx = state.pool.begin().await?;

    let mut attempt = 1;
    let order = loop {
        let order_number =
            shared::util::order_number(now, rand::thread_rng().gen_range(0..10_000));
        let new_order = orders::NewOrder {
            order_number: &order_number,
            user_id,
            customer_name: req.customer_name.trim(),
            phone: req.phone.trim(),
            email: req.email.as_deref(),
            shipping_address: req.shipping_address.trim(),
            shipping_area: req.shipping_area.as_deref(),
            notes: req.notes.as_deref(),
            payment_method_id: req.payment_method_id,
            shipping_method_id: method.id,
            coupon_code: coupon_code.as_deref(),
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            shipping_cost: totals.shipping_cost,
            total_amount: totals.total_amount,
        };

        // Savepoint, so a collision does not abort the whole transaction
        let mut savepoint = sqlx::Connection::begin(&mut *tx).await?;
        match orders::insert(&mut savepoint, &new_order).await {
            Ok(order) => {
                savepoint.commit().await?;
                break order;
            }
            Err(e) if retry_order_number(&e, attempt) => {
                savepoint.rollback().await?;
                tracing::warn!(
                    order_number = %order_number,
                    attempt,
                    "Order number taken, drawing another"
                );
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    };

    for line in &lines {
        orders::insert_item(
            &mut tx,
            order.id,
            &orders::NewOrderItem {
                product_id: line.product_id,
                variant_id: line.variant_id,
                product_name: &line.product_name,
                size: line.size.as_deref(),
                color: line.color.as_deref(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total,
            },
        )
        .await?;

        if let Some(variant_id) = line.variant_id
            && !catalog::decrement_stock(&mut tx, variant_id, line.quantity).await?
        {
            return Err(AppError::with_message(
                ErrorCode::ProductOutOfStock,
                format!("{} just sold out", line.product_name),
            )
            .into());
        }
    }

    if let Some((coupon, _)) = &applied
        && !coupons::redeem(&mut tx, coupon.id).await?
    {
        return Err(AppError::new(ErrorCode::CouponUsageLimitReached).into());
    }

    tx.commit().await?;

    tracing::info!(
        order_number = %order.order_number,
        total = %order.total_amount,
        coupon = ?coupon_code,
        guest = user_id.is_none(),
        "Order placed"
    );

    Ok(CheckoutResponse {
        order_id: order.id,
        order_number: order.order_number,
        status: order.status,
        subtotal: order.subtotal,
        discount_amount: order.discount_amount,
        shipping_cost: order.shipping_cost,
        total_amount: order.total_amount,
    })
}
