use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::MessageEntity,
    dto::{format_system_time, validation::validate_not_blank},
};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000), custom(function = "validate_not_blank"))]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub subject: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<MessageEntity> for MessageResponse {
    fn from(message: MessageEntity) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            subject: message.subject,
            content: message.content,
            is_read: message.is_read,
            created_at: format_system_time(message.created_at),
        }
    }
}
