//! Session-owner lookups used by the client's auth bootstrap

use axum::{Json, extract::State};
use shared::client::{AccountProfile, RoleInfo};

use crate::auth::CurrentUser;
use crate::db::accounts;
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/account/profile
///
/// Users without a profile row are active.
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<AccountProfile> {
    let profile = accounts::find_profile(&state.pool, user.id)
        .await
        .map_err(ServiceError::from)?;

    Ok(Json(match profile {
        Some(p) => AccountProfile {
            user_id: p.user_id,
            full_name: p.full_name,
            phone: p.phone,
            is_active: p.is_active,
        },
        None => AccountProfile {
            user_id: user.id,
            full_name: None,
            phone: None,
            is_active: true,
        },
    }))
}

/// GET /api/account/role
pub async fn get_role(State(state): State<AppState>, user: CurrentUser) -> ApiResult<RoleInfo> {
    let role = accounts::find_role(&state.pool, user.id)
        .await
        .map_err(ServiceError::from)?
        .unwrap_or_default();

    Ok(Json(RoleInfo {
        user_id: user.id,
        role,
        permissions: role.permissions(),
    }))
}
