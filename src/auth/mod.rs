//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{extract_token, require_admin, AdminUser, CurrentUser, AUTH_COOKIE};
pub use password::PasswordHasher;
