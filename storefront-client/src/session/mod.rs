//! Session bootstrap
//!
//! [`AuthContext`] resolves who the current user is when the app starts:
//!
//! ```text
//!                 ┌──────────────┐
//!                 │ Initializing │──── bounded wait elapsed ───▶ TimedOut
//!                 └──────┬───────┘
//!        no session      │ session
//!      ┌─────────────────┼───────────────────────┐
//!      ▼                 ▼                       ▼
//!  Anonymous      active flag false        active + role
//!                 (sign out) Disabled      Authenticated
//! ```
//!
//! The timer and the initial resolution race; a single `settled` flag lets
//! exactly one of them publish. Session-change events received afterwards
//! re-run the resolution and always publish.

mod provider;

pub use provider::{RemoteSessionProvider, Session, SessionEvent, SessionProvider};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use shared::error::ErrorCode;
use shared::models::{Role, RolePermissions};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::ClientConfig;

/// Observable bootstrap state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Initializing,
    Authenticated {
        user_id: Uuid,
        role: Role,
        permissions: RolePermissions,
    },
    Anonymous,
    /// Account deactivated; the user has been signed out
    Disabled { message: String },
    /// Backend did not answer in time; treated as anonymous
    TimedOut { error: String },
}

impl SessionState {
    pub fn authenticated(user_id: Uuid, role: Role) -> Self {
        SessionState::Authenticated {
            user_id,
            role,
            permissions: role.permissions(),
        }
    }

    fn disabled() -> Self {
        SessionState::Disabled {
            message: ErrorCode::AccountDisabled.message().to_string(),
        }
    }

    fn timed_out() -> Self {
        SessionState::TimedOut {
            error: ErrorCode::SessionTimeout.message().to_string(),
        }
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self, SessionState::Initializing)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            SessionState::Authenticated { user_id, .. } => Some(*user_id),
            _ => None,
        }
    }

    /// Permissions for the UI; everything but `Authenticated` gets none
    pub fn permissions(&self) -> RolePermissions {
        match self {
            SessionState::Authenticated { permissions, .. } => *permissions,
            _ => RolePermissions::default(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.permissions().is_admin
    }

    pub fn is_staff(&self) -> bool {
        self.permissions().is_staff
    }

    /// User-facing message for `Disabled` and `TimedOut`
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Disabled { message } => Some(message),
            SessionState::TimedOut { error } => Some(error),
            _ => None,
        }
    }
}

/// Client-side auth context
///
/// Must be created inside a tokio runtime. Dropping it has the same effect as
/// [`shutdown`](Self::shutdown).
pub struct AuthContext {
    state: Arc<watch::Sender<SessionState>>,
    cancel: CancellationToken,
}

impl AuthContext {
    /// Start bootstrapping with the configured bounded wait
    pub fn new(provider: Arc<dyn SessionProvider>, config: &ClientConfig) -> Self {
        Self::with_timeout(provider, config.bootstrap_timeout)
    }

    pub fn with_timeout(provider: Arc<dyn SessionProvider>, timeout: Duration) -> Self {
        let (tx, _) = watch::channel(SessionState::Initializing);
        let state = Arc::new(tx);
        let settled = Arc::new(AtomicBool::new(false));
        let cancel = CancellationToken::new();

        // Subscribe before the initial lookup so no change slips between them
        let events = provider.subscribe();

        tokio::spawn(bounded_wait(
            timeout,
            state.clone(),
            settled.clone(),
            cancel.clone(),
        ));
        tokio::spawn(run(
            provider,
            events,
            state.clone(),
            settled,
            cancel.clone(),
        ));

        Self { state, cancel }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Wait until the bootstrap leaves `Initializing`
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| !s.is_initializing()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Stop listening for session changes and cancel the pending timer
    ///
    /// No transition is published once this returns.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        // Wait out a publish that passed its cancellation check
        self.state.send_if_modified(|_| false);
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for AuthContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Publish `next` unless the context was torn down
fn publish(
    state: &watch::Sender<SessionState>,
    cancel: &CancellationToken,
    next: SessionState,
) -> bool {
    state.send_if_modified(|current| {
        if cancel.is_cancelled() {
            return false;
        }
        tracing::debug!(from = ?current, to = ?next, "Session state transition");
        *current = next;
        true
    })
}

async fn bounded_wait(
    timeout: Duration,
    state: Arc<watch::Sender<SessionState>>,
    settled: Arc<AtomicBool>,
    cancel: CancellationToken,
) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = tokio::time::sleep(timeout) => {
            if !settled.swap(true, Ordering::SeqCst) {
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "Session bootstrap timed out"
                );
                publish(&state, &cancel, SessionState::timed_out());
            }
        }
    }
}

async fn run(
    provider: Arc<dyn SessionProvider>,
    mut events: broadcast::Receiver<SessionEvent>,
    state: Arc<watch::Sender<SessionState>>,
    settled: Arc<AtomicBool>,
    cancel: CancellationToken,
) {
    let initial = tokio::select! {
        _ = cancel.cancelled() => return,
        resolved = resolve_current(provider.as_ref()) => resolved,
    };
    if settled.swap(true, Ordering::SeqCst) {
        tracing::debug!(resolved = ?initial, "Initial session resolved after timeout, ignored");
    } else {
        publish(&state, &cancel, initial);
    }

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => return,
            event = events.recv() => event,
        };

        let next = match event {
            Ok(SessionEvent::SignedOut)
                if matches!(*state.borrow(), SessionState::Disabled { .. }) =>
            {
                // Our own forced sign-out; keep the disabled message up
                continue;
            }
            Ok(event) => {
                tracing::debug!(?event, "Session changed");
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    resolved = resolve(provider.as_ref(), event.session()) => resolved,
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Missed session events, re-reading current session");
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    resolved = resolve_current(provider.as_ref()) => resolved,
                }
            }
            Err(RecvError::Closed) => return,
        };

        settled.store(true, Ordering::SeqCst);
        publish(&state, &cancel, next);
    }
}

async fn resolve_current(provider: &dyn SessionProvider) -> SessionState {
    match provider.current_session().await {
        Ok(session) => resolve(provider, session.as_ref()).await,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read current session");
            SessionState::Anonymous
        }
    }
}

/// Decide the state for `session`
///
/// The active flag is checked before the role lookup and again after it, so
/// an account disabled in between still ends up `Disabled`.
async fn resolve(provider: &dyn SessionProvider, session: Option<&Session>) -> SessionState {
    let Some(session) = session else {
        return SessionState::Anonymous;
    };

    if !check_active(provider, session).await {
        return force_sign_out(provider, session).await;
    }

    let role = match provider.fetch_role(session).await {
        Ok(role) => role.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(
                user_id = %session.user_id,
                error = %e,
                "Role lookup failed, using customer"
            );
            Role::Customer
        }
    };

    if !check_active(provider, session).await {
        return force_sign_out(provider, session).await;
    }

    tracing::info!(user_id = %session.user_id, role = %role, "Session authenticated");
    SessionState::authenticated(session.user_id, role)
}

/// Only an explicit `false` disables; lookup failures are left to the server
async fn check_active(provider: &dyn SessionProvider, session: &Session) -> bool {
    match provider.is_active(session).await {
        Ok(active) => active,
        Err(e) => {
            tracing::warn!(user_id = %session.user_id, error = %e, "Profile lookup failed");
            true
        }
    }
}

async fn force_sign_out(provider: &dyn SessionProvider, session: &Session) -> SessionState {
    tracing::warn!(user_id = %session.user_id, "Account disabled, signing out");
    if let Err(e) = provider.sign_out().await {
        tracing::error!(error = %e, "Sign-out of disabled account failed");
    }
    SessionState::disabled()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions_follow_role() {
        let id = Uuid::new_v4();
        let admin = SessionState::authenticated(id, Role::Admin);
        assert!(admin.is_admin() && admin.is_staff());
        assert_eq!(admin.user_id(), Some(id));

        let handler = SessionState::authenticated(id, Role::OrderHandler);
        assert!(!handler.is_admin() && handler.is_staff());

        let customer = SessionState::authenticated(id, Role::Customer);
        assert!(!customer.is_staff());
    }

    #[test]
    fn test_timed_out_is_anonymous_for_ui() {
        let state = SessionState::timed_out();
        assert_eq!(state.permissions(), RolePermissions::default());
        assert_eq!(state.user_id(), None);
        assert_eq!(
            state.error_message(),
            Some(ErrorCode::SessionTimeout.message())
        );
    }

    #[test]
    fn test_disabled_carries_fixed_message() {
        assert_eq!(
            SessionState::disabled().error_message(),
            Some("Your account has been disabled. Please contact support.")
        );
    }
}
