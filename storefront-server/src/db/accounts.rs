//! Profiles and role assignments

use shared::models::{Profile, Role};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn find_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as("SELECT user_id, full_name, phone, is_active FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Highest-privilege role assigned to the user, `None` without any row
pub async fn find_role(pool: &PgPool, user_id: Uuid) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT role FROM user_roles WHERE user_id = $1
         ORDER BY CASE role
             WHEN 'admin' THEN 0
             WHEN 'manager' THEN 1
             WHEN 'order_handler' THEN 2
             ELSE 3
         END
         LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
