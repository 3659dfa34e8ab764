//! Bearer-token authentication
//!
//! Access tokens are HS256 JWTs whose subject is the user's UUID. Issuing them belongs to
//! an external identity service; this service only validates them.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{issue_access_token, validate_access_token};
pub use middleware::{auth_middleware, AuthState};
pub use models::AuthUser;
