//! Variant selection for the product page

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{ProductVariant, available_colors, available_sizes};
use uuid::Uuid;

use crate::db::catalog;
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

#[derive(Debug, Serialize)]
pub struct VariantOptions {
    pub product_id: Uuid,
    /// Selectable variants only (active, in stock)
    pub variants: Vec<ProductVariant>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
}

/// GET /api/products/{id}/variants
pub async fn list_variants(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> ApiResult<VariantOptions> {
    if !catalog::product_exists(&state.pool, product_id)
        .await
        .map_err(ServiceError::from)?
    {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }

    let variants = catalog::list_variants(&state.pool, &[product_id])
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(VariantOptions {
        product_id,
        sizes: available_sizes(&variants),
        colors: available_colors(&variants, None),
        variants: variants.into_iter().filter(|v| v.is_selectable()).collect(),
    }))
}
