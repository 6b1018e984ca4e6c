//! Profile Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account profile (`profiles` table), one row per identity-provider user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    /// `false` = disabled by staff, sessions are refused
    pub is_active: bool,
}
