use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{ContactEntity, ContactStatus},
    dto::{format_system_time, validation::validate_not_blank},
};

/// Public contact-form submission.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000), custom(function = "validate_not_blank"))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: String,
}

impl From<ContactEntity> for ContactResponse {
    fn from(contact: ContactEntity) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            subject: contact.subject,
            message: contact.message,
            status: contact.status,
            created_at: format_system_time(contact.created_at),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ContactStatusRequest {
    pub status: ContactStatus,
}
