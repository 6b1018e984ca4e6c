//! Courier relay (admin only)
//!
//! Every action is written to `courier_logs`, successful or not. Failures are
//! returned to the caller as structured errors and never retried.

use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Value, json};
use shared::client::{CourierRequest, CourierResponse};
use shared::courier::apply_delivery_status;
use shared::error::{AppError, ErrorCode};
use shared::models::{CourierAction, CourierStatus, Order, OrderStatus};
use uuid::Uuid;

use crate::courier::{self, CourierApiError, CourierCredentials, ParcelRequest};
use crate::db::{self, orders};
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// POST /functions/v1/courier
pub async fn handle(
    State(state): State<AppState>,
    Json(req): Json<CourierRequest>,
) -> ApiResult<CourierResponse> {
    let settings = db::courier::get_settings(&state.pool)
        .await
        .map_err(ServiceError::from)?
        .filter(|s| s.is_enabled && !s.api_key.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::CourierNotConfigured))?;
    let creds = CourierCredentials::from_settings(&settings, &state.courier_base_url);

    let response = match req {
        CourierRequest::TestConnection => test_connection(&state, &creds).await?,
        CourierRequest::CreateParcel { order_id } => create_parcel(&state, &creds, order_id).await?,
        CourierRequest::TrackStatus { order_id } => track_status(&state, &creds, order_id).await?,
    };
    Ok(Json(response))
}

async fn load_order(state: &AppState, order_id: Uuid) -> Result<Order, AppError> {
    orders::find_by_id(&state.pool, order_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))
}

/// Write the audit row; a logging failure must not hide the courier result
async fn record<T>(
    state: &AppState,
    order_id: Option<Uuid>,
    action: CourierAction,
    request: Option<&Value>,
    result: &Result<(T, Value), CourierApiError>,
) {
    let outcome = match result {
        Ok((_, body)) => {
            db::courier::log(&state.pool, order_id, action, request, Some(body), None).await
        }
        Err(e) => {
            let message = e.to_string();
            db::courier::log(&state.pool, order_id, action, request, e.body(), Some(&message))
                .await
        }
    };
    if let Err(e) = outcome {
        tracing::error!(action = action.as_str(), "Failed to write courier log: {e}");
    }
}

fn upstream_error(action: CourierAction, e: CourierApiError) -> AppError {
    tracing::warn!(action = action.as_str(), "Courier call failed: {e}");
    AppError::with_message(ErrorCode::CourierRequestFailed, e.to_string())
        .with_detail("action", action.as_str())
}

async fn test_connection(
    state: &AppState,
    creds: &CourierCredentials,
) -> Result<CourierResponse, AppError> {
    let action = CourierAction::TestConnection;
    let result = courier::get_balance(&state.http, creds).await;
    record(state, None, action, None, &result).await;
    let (balance, _) = result.map_err(|e| upstream_error(action, e))?;

    Ok(CourierResponse {
        success: true,
        message: "Courier connection OK".into(),
        balance: Some(balance),
        consignment_id: None,
        tracking_code: None,
        courier_status: None,
        order_status: None,
    })
}

async fn create_parcel(
    state: &AppState,
    creds: &CourierCredentials,
    order_id: Uuid,
) -> Result<CourierResponse, AppError> {
    let action = CourierAction::CreateParcel;
    let order = load_order(state, order_id).await?;
    if order.courier_consignment_id.is_some() {
        return Err(AppError::new(ErrorCode::CourierAlreadySent)
            .with_detail("order_number", order.order_number));
    }

    let parcel = ParcelRequest {
        invoice: order.order_number.clone(),
        recipient_name: order.customer_name.clone(),
        recipient_phone: shared::util::normalize_phone(&order.phone),
        recipient_address: match &order.shipping_area {
            Some(area) => format!("{}, {}", order.shipping_address, area),
            None => order.shipping_address.clone(),
        },
        cod_amount: order.due_amount,
        note: order.notes.clone(),
    };
    let request_payload = serde_json::to_value(&parcel).unwrap_or(Value::Null);

    let result = courier::create_order(&state.http, creds, &parcel).await;
    record(state, Some(order.id), action, Some(&request_payload), &result).await;
    let (consignment, _) = result.map_err(|e| upstream_error(action, e))?;

    let consignment_id = consignment.consignment_id().ok_or_else(|| {
        upstream_error(action, CourierApiError::InvalidResponse("missing consignment_id".into()))
    })?;
    let courier_status =
        apply_delivery_status(consignment.status.as_deref(), CourierStatus::Pending);

    orders::set_consignment(
        &state.pool,
        order.id,
        &consignment_id,
        consignment.tracking_code.as_deref(),
        courier_status,
        Utc::now(),
    )
    .await
    .map_err(ServiceError::from)?;

    tracing::info!(
        order_number = %order.order_number,
        consignment_id = %consignment_id,
        "Parcel created"
    );

    Ok(CourierResponse {
        success: true,
        message: "Parcel created".into(),
        balance: None,
        consignment_id: Some(consignment_id),
        tracking_code: consignment.tracking_code,
        courier_status: Some(courier_status),
        order_status: None,
    })
}

/// Result of applying a carrier status to an order
#[derive(Debug, PartialEq, Eq)]
struct TrackingUpdate {
    courier_status: CourierStatus,
    /// Order status to persist; `None` leaves the stored one alone
    order_status: Option<OrderStatus>,
}

impl TrackingUpdate {
    fn from_carrier(raw: Option<&str>, current: CourierStatus) -> Self {
        let courier_status = apply_delivery_status(raw, current);
        Self {
            courier_status,
            order_status: courier_status.order_status_effect(),
        }
    }
}

async fn track_status(
    state: &AppState,
    creds: &CourierCredentials,
    order_id: Uuid,
) -> Result<CourierResponse, AppError> {
    let action = CourierAction::TrackStatus;
    let order = load_order(state, order_id).await?;
    let consignment_id = order
        .courier_consignment_id
        .clone()
        .ok_or_else(|| AppError::new(ErrorCode::CourierConsignmentMissing))?;

    let request_payload = json!({ "consignment_id": consignment_id });
    let result = courier::status_by_consignment(&state.http, creds, &consignment_id).await;
    record(state, Some(order.id), action, Some(&request_payload), &result).await;
    let (raw_status, _) = result.map_err(|e| upstream_error(action, e))?;

    let TrackingUpdate {
        courier_status,
        order_status,
    } = TrackingUpdate::from_carrier(raw_status.as_deref(), order.courier_status);

    orders::set_courier_status(&state.pool, order.id, courier_status, order_status)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(
        order_number = %order.order_number,
        raw_status = ?raw_status,
        courier_status = ?courier_status,
        "Courier status refreshed"
    );

    Ok(CourierResponse {
        success: true,
        message: "Courier status updated".into(),
        balance: None,
        consignment_id: Some(consignment_id),
        tracking_code: order.courier_tracking_code,
        courier_status: Some(courier_status),
        order_status: Some(order_status.unwrap_or(order.status)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivered_completes_order() {
        let update = TrackingUpdate::from_carrier(Some("Delivered"), CourierStatus::InTransit);
        assert_eq!(update.courier_status, CourierStatus::Delivered);
        assert_eq!(update.order_status, Some(OrderStatus::Delivered));
    }

    #[test]
    fn test_unknown_carrier_status_ships_order() {
        let update = TrackingUpdate::from_carrier(Some("out_for_delivery"), CourierStatus::Pending);
        assert_eq!(update.courier_status, CourierStatus::InTransit);
        assert_eq!(update.order_status, Some(OrderStatus::Shipped));
    }

    #[test]
    fn test_missing_status_keeps_current_and_order_untouched() {
        let update = TrackingUpdate::from_carrier(None, CourierStatus::Pending);
        assert_eq!(
            update,
            TrackingUpdate {
                courier_status: CourierStatus::Pending,
                order_status: None,
            }
        );

        let update = TrackingUpdate::from_carrier(Some("  "), CourierStatus::Cancelled);
        assert_eq!(update.courier_status, CourierStatus::Cancelled);
        assert_eq!(update.order_status, None);
    }

    #[test]
    fn test_in_review_is_pending() {
        let update = TrackingUpdate::from_carrier(Some("in_review"), CourierStatus::Pending);
        assert_eq!(update.courier_status, CourierStatus::Pending);
        assert_eq!(update.order_status, None);
    }
}
