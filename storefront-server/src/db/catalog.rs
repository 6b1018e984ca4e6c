use shared::models::{Product, ProductVariant};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub async fn find_products(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, slug, price, sale_price, is_active FROM products WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

pub async fn product_exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND is_active)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// All variants of the given products, in catalog order
pub async fn list_variants(
    pool: &PgPool,
    product_ids: &[Uuid],
) -> Result<Vec<ProductVariant>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, product_id, size, color, stock, price_adjustment, is_active
         FROM product_variants WHERE product_id = ANY($1)
         ORDER BY product_id, size NULLS FIRST, color NULLS FIRST",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await
}

/// Take `quantity` units from a variant; `false` when stock ran out meanwhile
pub async fn decrement_stock(
    conn: &mut PgConnection,
    variant_id: Uuid,
    quantity: i32,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE product_variants SET stock = stock - $2
         WHERE id = $1 AND is_active AND stock >= $2",
    )
    .bind(variant_id)
    .bind(quantity)
    .execute(conn)
    .await?
    .rows_affected();
    Ok(rows == 1)
}
