use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{Role, UserEntity},
    dto::{format_system_time, validation::validate_username},
};

/// Public profile of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserEntity> for UserResponse {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: format_system_time(user.created_at),
            updated_at: format_system_time(user.updated_at),
        }
    }
}

/// Minimal projection used inside participant and team listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

/// Changes a user may apply to their own profile.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateMeRequest {
    #[serde(default)]
    #[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

/// Changes an administrator may apply to any account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdminUpdateUserRequest {
    #[serde(default)]
    #[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}
