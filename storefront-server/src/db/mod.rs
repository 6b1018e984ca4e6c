//! Database access layer
//!
//! One function per query shape. Functions that must join a checkout
//! transaction take `&mut PgConnection`; the rest take `&PgPool`.

pub mod accounts;
pub mod catalog;
pub mod coupons;
pub mod courier;
pub mod engagement;
pub mod orders;
pub mod store;
