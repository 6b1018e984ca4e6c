//! Product reviews: public approved list, authenticated submission

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::ReviewCreateRequest;
use shared::error::{AppError, ErrorCode};
use shared::models::Review;
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::db::{accounts, catalog, engagement};
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/products/{id}/reviews
pub async fn list(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Vec<Review>> {
    let reviews = engagement::list_approved_reviews(&state.pool, product_id)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(reviews))
}

/// POST /api/products/{id}/reviews
///
/// Stored unapproved; staff approve before it becomes public.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(req): Json<ReviewCreateRequest>,
) -> ApiResult<Review> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    if !catalog::product_exists(&state.pool, product_id)
        .await
        .map_err(ServiceError::from)?
    {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }

    let profile = accounts::find_profile(&state.pool, user.id)
        .await
        .map_err(ServiceError::from)?;
    if profile.as_ref().is_some_and(|p| !p.is_active) {
        return Err(AppError::account_disabled());
    }
    let reviewer_name = profile.and_then(|p| p.full_name);

    let comment = req.comment.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let review = engagement::insert_review(
        &state.pool,
        product_id,
        user.id,
        reviewer_name.as_deref(),
        req.rating,
        comment,
    )
    .await
    .map_err(ServiceError::from)?;

    Ok(Json(review))
}
