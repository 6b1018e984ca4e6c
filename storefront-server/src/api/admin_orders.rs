//! Staff order management

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use shared::client::{OrderStatusUpdate, PaymentSummary, PaymentUpdate};
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, PaymentStatus};
use uuid::Uuid;

use crate::auth::StaffUser;
use crate::db::orders;
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// PATCH /api/admin/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffUser>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<OrderStatusUpdate>,
) -> ApiResult<Order> {
    let order = orders::update_status(&state.pool, order_id, req.status)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    tracing::info!(
        order_number = %order.order_number,
        status = ?order.status,
        staff = %staff.user.id,
        "Order status changed"
    );
    Ok(Json(order))
}

/// Due amount and payment status after `paid_amount` has been received
pub fn settle(
    total_amount: Decimal,
    paid_amount: Decimal,
) -> Result<(Decimal, PaymentStatus), AppError> {
    if paid_amount < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::PaymentInvalidAmount));
    }
    let due = (total_amount - paid_amount).max(Decimal::ZERO);
    Ok((due, PaymentStatus::from_amounts(total_amount, paid_amount)))
}

/// PATCH /api/admin/orders/{id}/payment
pub async fn update_payment(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffUser>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<PaymentUpdate>,
) -> ApiResult<PaymentSummary> {
    let order = orders::find_by_id(&state.pool, order_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let (due_amount, payment_status) = settle(order.total_amount, req.paid_amount)?;
    orders::update_payment(&state.pool, order.id, req.paid_amount, due_amount, payment_status)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(
        order_number = %order.order_number,
        paid = %req.paid_amount,
        staff = %staff.user.id,
        "Payment recorded"
    );
    Ok(Json(PaymentSummary {
        order_id: order.id,
        payment_status,
        paid_amount: req.paid_amount,
        due_amount,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_partial_and_overpaid() {
        let total = Decimal::from(1500);
        assert_eq!(
            settle(total, Decimal::from(500)).unwrap(),
            (Decimal::from(1000), PaymentStatus::Partial)
        );
        assert_eq!(
            settle(total, Decimal::from(2000)).unwrap(),
            (Decimal::ZERO, PaymentStatus::Paid)
        );
        assert_eq!(
            settle(total, Decimal::ZERO).unwrap(),
            (total, PaymentStatus::Unpaid)
        );
    }

    #[test]
    fn test_settle_rejects_negative() {
        let err = settle(Decimal::from(100), Decimal::from(-1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidAmount);
    }
}
