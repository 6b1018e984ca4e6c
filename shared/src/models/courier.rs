//! Courier integration models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single-row courier credentials managed by admins
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CourierSettings {
    pub api_key: String,
    #[serde(skip_serializing)]
    pub secret_key: String,
    /// Overrides the configured default API base URL
    pub base_url: Option<String>,
    pub is_enabled: bool,
}

impl std::fmt::Debug for CourierSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourierSettings")
            .field("base_url", &self.base_url)
            .field("is_enabled", &self.is_enabled)
            .finish_non_exhaustive()
    }
}

/// Courier relay action recorded in `courier_logs`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CourierAction {
    TestConnection,
    CreateParcel,
    TrackStatus,
}

impl CourierAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourierAction::TestConnection => "test_connection",
            CourierAction::CreateParcel => "create_parcel",
            CourierAction::TrackStatus => "track_status",
        }
    }
}

/// Audit row for one courier relay call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CourierLog {
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub action: String,
    /// `success` | `failed`
    pub status: String,
    pub request_payload: Option<serde_json::Value>,
    pub response_payload: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}
