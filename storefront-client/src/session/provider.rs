//! Session source for [`super::AuthContext`]

use async_trait::async_trait;
use shared::models::Role;
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use crate::{ClientError, ClientResult, HttpClient};

/// A signed-in identity as handed out by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub access_token: String,
}

/// Session change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

impl SessionEvent {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionEvent::SignedIn(s) | SessionEvent::TokenRefreshed(s) => Some(s),
            SessionEvent::SignedOut => None,
        }
    }
}

/// Everything the bootstrap needs from the backend
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Session restored at startup, if any
    async fn current_session(&self) -> ClientResult<Option<Session>>;

    /// Subscribe to later session changes
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;

    /// The account's active flag
    async fn is_active(&self, session: &Session) -> ClientResult<bool>;

    /// Explicit role record; `None` when the user has none
    async fn fetch_role(&self, session: &Session) -> ClientResult<Option<Role>>;

    async fn sign_out(&self) -> ClientResult<()>;
}

/// [`SessionProvider`] backed by storefront-server's account endpoints
///
/// The application feeds identity-provider sessions in through
/// [`sign_in`](Self::sign_in) and [`refresh`](Self::refresh).
pub struct RemoteSessionProvider {
    http: HttpClient,
    current: Mutex<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl RemoteSessionProvider {
    pub fn new(http: HttpClient) -> Self {
        Self::from_parts(http, None)
    }

    /// Start with a session restored from storage
    pub fn with_session(http: HttpClient, session: Session) -> Self {
        Self::from_parts(http, Some(session))
    }

    fn from_parts(http: HttpClient, session: Option<Session>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            http,
            current: Mutex::new(session),
            events,
        }
    }

    pub async fn sign_in(&self, session: Session) {
        *self.current.lock().await = Some(session.clone());
        let _ = self.events.send(SessionEvent::SignedIn(session));
    }

    pub async fn refresh(&self, session: Session) {
        *self.current.lock().await = Some(session.clone());
        let _ = self.events.send(SessionEvent::TokenRefreshed(session));
    }

    fn client_for(&self, session: &Session) -> HttpClient {
        self.http.clone().with_token(session.access_token.clone())
    }
}

#[async_trait]
impl SessionProvider for RemoteSessionProvider {
    async fn current_session(&self) -> ClientResult<Option<Session>> {
        Ok(self.current.lock().await.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn is_active(&self, session: &Session) -> ClientResult<bool> {
        Ok(self.client_for(session).profile().await?.is_active)
    }

    async fn fetch_role(&self, session: &Session) -> ClientResult<Option<Role>> {
        match self.client_for(session).role().await {
            Ok(info) => Ok(Some(info.role)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn sign_out(&self) -> ClientResult<()> {
        if self.current.lock().await.take().is_some() {
            let _ = self.events.send(SessionEvent::SignedOut);
        }
        Ok(())
    }
}
