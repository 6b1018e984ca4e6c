//! Staff and admin guards
//!
//! Roles are looked up in `user_roles` on every request; the token only proves
//! identity. Disabled profiles are refused before the role is considered.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use shared::models::Role;

use crate::auth::CurrentUser;
use crate::auth::extractor::authenticate;
use crate::db::accounts;
use crate::state::AppState;

/// Caller that passed a role guard, available as an `Extension`
#[derive(Debug, Clone)]
pub struct StaffUser {
    pub user: CurrentUser,
    pub role: Role,
}

/// Access level a guarded route group demands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Staff,
    Admin,
}

impl Requirement {
    /// Decide from the stored profile flag and role row.
    ///
    /// `profile_active` is `None` when no profile exists; that account is
    /// treated as active. A missing role row is a customer.
    pub fn authorize(
        self,
        profile_active: Option<bool>,
        role: Option<Role>,
    ) -> Result<Role, AppError> {
        if profile_active == Some(false) {
            return Err(AppError::account_disabled());
        }
        let role = role.unwrap_or_default();
        let (allowed, denied) = match self {
            Requirement::Staff => (role.is_staff(), ErrorCode::StaffRequired),
            Requirement::Admin => (role.is_admin(), ErrorCode::AdminRequired),
        };
        if allowed { Ok(role) } else { Err(AppError::new(denied)) }
    }
}

fn lookup_failed(what: &str, e: sqlx::Error) -> AppError {
    tracing::error!("{what} lookup error: {e}");
    AppError::new(ErrorCode::DatabaseError)
}

async fn guard(
    state: &AppState,
    mut request: Request,
    next: Next,
    requirement: Requirement,
) -> Result<Response, AppError> {
    let user = authenticate(&state.jwt, request.headers())?
        .ok_or_else(AppError::not_authenticated)?;

    let profile = accounts::find_profile(&state.pool, user.id)
        .await
        .map_err(|e| lookup_failed("Profile", e))?;
    let profile_active = profile.map(|p| p.is_active);
    // Disabled accounts are refused without touching the role table
    let role_row = if profile_active == Some(false) {
        None
    } else {
        accounts::find_role(&state.pool, user.id)
            .await
            .map_err(|e| lookup_failed("Role", e))?
    };

    let role = requirement.authorize(profile_active, role_row).inspect_err(|e| {
        tracing::warn!(user_id = %user.id, uri = %request.uri(), "Role guard denied: {e}");
    })?;

    request.extensions_mut().insert(user.clone());
    request.extensions_mut().insert(StaffUser { user, role });
    Ok(next.run(request).await)
}

/// Admins, managers and order handlers
pub async fn require_staff(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard(&state, request, next, Requirement::Staff).await
}

/// Admins only
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard(&state, request, next, Requirement::Admin).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied_code(result: Result<Role, AppError>) -> ErrorCode {
        result.unwrap_err().code
    }

    #[test]
    fn test_customer_denied_admin_and_staff() {
        assert_eq!(
            denied_code(Requirement::Admin.authorize(Some(true), Some(Role::Customer))),
            ErrorCode::AdminRequired
        );
        assert_eq!(
            denied_code(Requirement::Staff.authorize(Some(true), None)),
            ErrorCode::StaffRequired
        );
    }

    #[test]
    fn test_manager_is_staff_but_not_admin() {
        assert_eq!(
            Requirement::Staff.authorize(Some(true), Some(Role::Manager)).unwrap(),
            Role::Manager
        );
        assert_eq!(
            Requirement::Staff.authorize(None, Some(Role::OrderHandler)).unwrap(),
            Role::OrderHandler
        );
        assert_eq!(
            denied_code(Requirement::Admin.authorize(Some(true), Some(Role::Manager))),
            ErrorCode::AdminRequired
        );
        assert_eq!(
            Requirement::Admin.authorize(Some(true), Some(Role::Admin)).unwrap(),
            Role::Admin
        );
    }

    #[test]
    fn test_disabled_profile_refused_before_role() {
        assert_eq!(
            denied_code(Requirement::Admin.authorize(Some(false), Some(Role::Admin))),
            ErrorCode::AccountDisabled
        );
        assert_eq!(
            denied_code(Requirement::Staff.authorize(Some(false), None)),
            ErrorCode::AccountDisabled
        );
    }
}
