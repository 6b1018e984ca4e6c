//! Courier credentials and the relay audit trail

use shared::models::{CourierAction, CourierSettings};
use sqlx::PgPool;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn get_settings(pool: &PgPool) -> Result<Option<CourierSettings>, sqlx::Error> {
    sqlx::query_as(
        "SELECT api_key, secret_key, base_url, is_enabled FROM courier_settings WHERE id = 1",
    )
    .fetch_optional(pool)
    .await
}

/// Write a `courier_logs` entry
pub async fn log(
    pool: &PgPool,
    order_id: Option<Uuid>,
    action: CourierAction,
    request_payload: Option<&serde_json::Value>,
    response_payload: Option<&serde_json::Value>,
    error_message: Option<&str>,
) -> Result<(), BoxError> {
    let status = if error_message.is_some() { "failed" } else { "success" };
    sqlx::query(
        "INSERT INTO courier_logs
             (order_id, action, status, request_payload, response_payload, error_message)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(order_id)
    .bind(action.as_str())
    .bind(status)
    .bind(request_payload)
    .bind(response_payload)
    .bind(error_message)
    .execute(pool)
    .await?;
    Ok(())
}
