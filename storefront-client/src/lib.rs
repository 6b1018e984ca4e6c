//! Storefront Client - typed HTTP client for storefront-server
//!
//! Also hosts the session bootstrap ([`session::AuthContext`]) that decides
//! whether the signed-in user is active, staff or admin.

pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use session::{
    AuthContext, RemoteSessionProvider, Session, SessionEvent, SessionProvider, SessionState,
};

// Re-export shared types for convenience
pub use shared::client::{AccountProfile, RoleInfo};
pub use shared::models::{Role, RolePermissions};
