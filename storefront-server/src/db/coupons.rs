use shared::models::Coupon;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const COUPON_COLUMNS: &str = "id, code, description, discount_type, discount_value, \
    min_order_amount, max_uses, used_count, starts_at, expires_at, is_active, created_at";

/// Look up by normalized (upper-case) code
pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Coupon>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COUPON_COLUMNS} FROM coupons WHERE upper(code) = $1"
    ))
    .bind(code)
    .fetch_optional(pool)
    .await
}

/// Count one use; `false` when the cap was reached by a concurrent checkout
pub async fn redeem(conn: &mut PgConnection, coupon_id: Uuid) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE coupons SET used_count = used_count + 1
         WHERE id = $1 AND (max_uses IS NULL OR used_count < max_uses)",
    )
    .bind(coupon_id)
    .execute(conn)
    .await?
    .rows_affected();
    Ok(rows == 1)
}
