//! HTTP boundary: middleware and session tokens.

pub mod middleware;
pub mod session;

pub use middleware::{limits, rate_limit, require_admin, RouteLimit};
pub use session::SessionStore;
