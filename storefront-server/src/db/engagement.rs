//! Reviews and wishlists

use shared::models::{Review, WishlistItem};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn list_approved_reviews(
    pool: &PgPool,
    product_id: Uuid,
) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, product_id, user_id, reviewer_name, rating, comment, is_approved, created_at
         FROM reviews WHERE product_id = $1 AND is_approved ORDER BY created_at DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await
}

/// New reviews wait for staff approval
pub async fn insert_review(
    pool: &PgPool,
    product_id: Uuid,
    user_id: Uuid,
    reviewer_name: Option<&str>,
    rating: i32,
    comment: Option<&str>,
) -> Result<Review, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO reviews (product_id, user_id, reviewer_name, rating, comment)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, product_id, user_id, reviewer_name, rating, comment, is_approved,
                   created_at",
    )
    .bind(product_id)
    .bind(user_id)
    .bind(reviewer_name)
    .bind(rating)
    .bind(comment)
    .fetch_one(pool)
    .await
}

pub async fn list_wishlist(pool: &PgPool, user_id: Uuid) -> Result<Vec<WishlistItem>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, user_id, product_id, created_at FROM wishlists
         WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Idempotent: adding an existing entry returns it unchanged
pub async fn add_to_wishlist(
    pool: &PgPool,
    user_id: Uuid,
    product_id: Uuid,
) -> Result<WishlistItem, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO wishlists (user_id, product_id) VALUES ($1, $2)
         ON CONFLICT (user_id, product_id) DO UPDATE SET user_id = EXCLUDED.user_id
         RETURNING id, user_id, product_id, created_at",
    )
    .bind(user_id)
    .bind(product_id)
    .fetch_one(pool)
    .await
}

pub async fn remove_from_wishlist(
    pool: &PgPool,
    user_id: Uuid,
    product_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM wishlists WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
