//! Bearer authentication, role guards and rate limiting

pub mod extractor;
pub mod jwt;
pub mod rate_limit;
pub mod roles;

pub use extractor::MaybeUser;
pub use jwt::{Claims, CurrentUser, JwtError, JwtService};
pub use roles::{StaffUser, require_admin, require_staff};
