use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{CourierStatus, Order, OrderItem, OrderStatus, PaymentStatus};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, order_number, user_id, customer_name, phone, email, \
    shipping_address, shipping_area, notes, status, payment_status, payment_method_id, \
    shipping_method_id, coupon_code, subtotal, discount_amount, shipping_cost, total_amount, \
    paid_amount, due_amount, courier_status, courier_consignment_id, courier_tracking_code, \
    courier_sent_at, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, variant_id, product_name, size, color, \
                            quantity, unit_price, line_total";

/// Priced order ready to persist
pub struct NewOrder<'a> {
    pub order_number: &'a str,
    pub user_id: Option<Uuid>,
    pub customer_name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub shipping_address: &'a str,
    pub shipping_area: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub payment_method_id: Option<Uuid>,
    pub shipping_method_id: Uuid,
    pub coupon_code: Option<&'a str>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub shipping_cost: Decimal,
    pub total_amount: Decimal,
}

pub struct NewOrderItem<'a> {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: &'a str,
    pub size: Option<&'a str>,
    pub color: Option<&'a str>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

pub async fn insert(conn: &mut PgConnection, order: &NewOrder<'_>) -> Result<Order, sqlx::Error> {
    sqlx::query_as(&format!(
        "INSERT INTO orders (order_number, user_id, customer_name, phone, email, shipping_address,
            shipping_area, notes, payment_method_id, shipping_method_id, coupon_code, subtotal,
            discount_amount, shipping_cost, total_amount, due_amount)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order.order_number)
    .bind(order.user_id)
    .bind(order.customer_name)
    .bind(order.phone)
    .bind(order.email)
    .bind(order.shipping_address)
    .bind(order.shipping_area)
    .bind(order.notes)
    .bind(order.payment_method_id)
    .bind(order.shipping_method_id)
    .bind(order.coupon_code)
    .bind(order.subtotal)
    .bind(order.discount_amount)
    .bind(order.shipping_cost)
    .bind(order.total_amount)
    .fetch_one(conn)
    .await
}

pub async fn insert_item(
    conn: &mut PgConnection,
    order_id: Uuid,
    item: &NewOrderItem<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, variant_id, product_name, size, color,
            quantity, unit_price, line_total)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(order_id)
    .bind(item.product_id)
    .bind(item.variant_id)
    .bind(item.product_name)
    .bind(item.size)
    .bind(item.color)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.line_total)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_number(
    pool: &PgPool,
    order_number: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
    ))
    .bind(order_number)
    .fetch_optional(pool)
    .await
}

pub async fn list_items(pool: &PgPool, order_id: Uuid) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY product_name"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: OrderStatus,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await
}

pub async fn update_payment(
    pool: &PgPool,
    id: Uuid,
    paid_amount: Decimal,
    due_amount: Decimal,
    payment_status: PaymentStatus,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE orders
         SET paid_amount = $2, due_amount = $3, payment_status = $4, updated_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .bind(paid_amount)
    .bind(due_amount)
    .bind(payment_status)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows == 1)
}

/// Record a parcel accepted by the courier
pub async fn set_consignment(
    pool: &PgPool,
    id: Uuid,
    consignment_id: &str,
    tracking_code: Option<&str>,
    courier_status: CourierStatus,
    sent_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE orders SET courier_consignment_id = $2, courier_tracking_code = $3,
            courier_status = $4, courier_sent_at = $5, updated_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .bind(consignment_id)
    .bind(tracking_code)
    .bind(courier_status)
    .bind(sent_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Persist a polled courier status and, when given, the order status it implies
pub async fn set_courier_status(
    pool: &PgPool,
    id: Uuid,
    courier_status: CourierStatus,
    order_status: Option<OrderStatus>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE orders SET courier_status = $2, status = COALESCE($3, status), updated_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .bind(courier_status)
    .bind(order_status)
    .execute(pool)
    .await?;
    Ok(())
}
