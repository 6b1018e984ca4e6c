use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::WishlistAddRequest;
use shared::error::{AppError, ErrorCode};
use shared::models::WishlistItem;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::db::{catalog, engagement};
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/wishlist
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Vec<WishlistItem>> {
    let items = engagement::list_wishlist(&state.pool, user.id)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(items))
}

/// POST /api/wishlist
pub async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<WishlistAddRequest>,
) -> ApiResult<WishlistItem> {
    if !catalog::product_exists(&state.pool, req.product_id)
        .await
        .map_err(ServiceError::from)?
    {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }
    let item = engagement::add_to_wishlist(&state.pool, user.id, req.product_id)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(item))
}

/// DELETE /api/wishlist/{product_id}
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> ApiResult<bool> {
    let removed = engagement::remove_from_wishlist(&state.pool, user.id, product_id)
        .await
        .map_err(ServiceError::from)?;
    if !removed {
        return Err(AppError::not_found("Wishlist item"));
    }
    Ok(Json(true))
}
