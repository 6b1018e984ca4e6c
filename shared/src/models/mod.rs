//! Data models
//!
//! Shared between storefront-server and storefront-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are UUIDs (identity-provider compatible).

pub mod coupon;
pub mod courier;
pub mod order;
pub mod product;
pub mod profile;
pub mod review;
pub mod role;
pub mod store;

// Re-exports
pub use coupon::*;
pub use courier::*;
pub use order::*;
pub use product::*;
pub use profile::*;
pub use review::*;
pub use role::*;
pub use store::*;
