//! Public order tracking by order number + phone

use axum::{
    Json,
    extract::{Query, State},
};
use shared::client::{TrackOrderQuery, TrackedOrder};
use shared::error::{AppError, ErrorCode};
use shared::util::phones_match;
use validator::Validate;

use crate::db::orders;
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/orders/track?order_number=..&phone=..
pub async fn track_order(
    State(state): State<AppState>,
    Query(query): Query<TrackOrderQuery>,
) -> ApiResult<TrackedOrder> {
    query
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let order = orders::find_by_number(&state.pool, query.order_number.trim())
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if !phones_match(&order.phone, &query.phone) {
        tracing::info!(order_number = %order.order_number, "Tracking phone mismatch");
        return Err(AppError::new(ErrorCode::OrderPhoneMismatch));
    }

    let items = orders::list_items(&state.pool, order.id)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(TrackedOrder {
        order_number: order.order_number,
        status: order.status,
        payment_status: order.payment_status,
        courier_status: order.courier_status,
        courier_tracking_code: order.courier_tracking_code,
        total_amount: order.total_amount,
        paid_amount: order.paid_amount,
        due_amount: order.due_amount,
        created_at: order.created_at,
        items,
    }))
}
