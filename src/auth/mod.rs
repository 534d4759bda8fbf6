//! Session tokens, password hashing and the request-level authentication guards.

pub mod extract;
pub mod password;
pub mod session;
pub mod token;

pub use self::extract::{AuthUser, require_admin};
pub use self::session::SessionRegistry;
pub use self::token::{Claims, IssuedToken, TokenError, TokenKeys};
