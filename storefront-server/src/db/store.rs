//! Store settings, shipping and payment configuration

use shared::models::{PaymentMethod, ShippingMethod, ShippingZone, StoreSettings};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn get_settings(pool: &PgPool) -> Result<Option<StoreSettings>, sqlx::Error> {
    sqlx::query_as(
        "SELECT store_name, currency, contact_email, contact_phone, address, free_shipping_threshold
         FROM store_settings WHERE id = 1",
    )
    .fetch_optional(pool)
    .await
}

pub async fn list_shipping_methods(pool: &PgPool) -> Result<Vec<ShippingMethod>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, description, cost, estimated_days, is_active, sort_order
         FROM shipping_methods WHERE is_active ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_shipping_method(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ShippingMethod>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, description, cost, estimated_days, is_active, sort_order
         FROM shipping_methods WHERE id = $1 AND is_active",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_shipping_zones(pool: &PgPool) -> Result<Vec<ShippingZone>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, areas, charge, is_active FROM shipping_zones
         WHERE is_active ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_payment_methods(pool: &PgPool) -> Result<Vec<PaymentMethod>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, account_number, instructions, is_active, sort_order
         FROM payment_methods WHERE is_active ORDER BY sort_order, name",
    )
    .fetch_all(pool)
    .await
}

pub async fn payment_method_exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM payment_methods WHERE id = $1 AND is_active)")
        .bind(id)
        .fetch_one(pool)
        .await
}
