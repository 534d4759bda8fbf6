//! DTO definitions for registration, login and session endpoints.

use std::time::{Duration, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::{format_system_time, user::UserResponse, validation::validate_username};

/// Payload used to create a new account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Credentials exchanged for a session token.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Session token and the profile it was issued for.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// RFC 3339 expiry of `token`.
    pub expires_at: String,
    pub user: UserResponse,
}

impl AuthResponse {
    /// `expires_at` is the token expiry in seconds since the Unix epoch.
    pub fn new(token: String, expires_at: u64, user: UserResponse) -> Self {
        Self {
            token,
            expires_at: format_system_time(UNIX_EPOCH + Duration::from_secs(expires_at)),
            user,
        }
    }
}
