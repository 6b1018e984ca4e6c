//! Storefront server
//!
//! HTTP service over PostgreSQL:
//! - Catalog, checkout and order tracking for shoppers
//! - Wishlists and reviews for signed-in users
//! - Staff order management (role-guarded)
//! - Conversions API relay and courier relay ("functions")
//!
//! # Module layout
//!
//! ```text
//! storefront-server/src/
//! ├── api/        # routes and handlers
//! ├── auth/       # bearer validation, role guards, rate limiting
//! ├── capi/       # Conversions API client and identifier hashing
//! ├── courier/    # courier REST client
//! ├── db/         # repository functions (sqlx)
//! └── services/   # checkout workflow
//! ```

pub mod api;
pub mod auth;
pub mod capi;
pub mod config;
pub mod courier;
pub mod db;
pub mod error;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
