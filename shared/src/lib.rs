//! Shared types for the storefront
//!
//! Domain models, the unified error system, request/response DTOs and the
//! pure domain rules (coupon evaluation, courier status mapping) used by
//! both storefront-server and storefront-client.

pub mod client;
pub mod coupon;
pub mod courier;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use coupon::{CouponError, CouponOutcome};
pub use error::{ApiResponse, AppError, ErrorCode};
