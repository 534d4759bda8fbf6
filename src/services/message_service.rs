use std::time::SystemTime;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dao::models::{MessageEntity, MessageFilter, NotificationKind},
    dto::message::{MessageResponse, SendMessageRequest},
    error::ServiceError,
    services::notification_service::{dispatch, notification},
    state::SharedState,
};

/// Deliver a direct message and notify its recipient.
pub async fn send(
    state: &SharedState,
    actor: &AuthUser,
    request: SendMessageRequest,
) -> Result<MessageResponse, ServiceError> {
    if request.recipient_id == actor.id {
        return Err(ServiceError::InvalidInput(
            "cannot send a message to yourself".into(),
        ));
    }

    let store = state.require_store().await?;
    if store.find_user(request.recipient_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "user {} not found",
            request.recipient_id
        )));
    }

    let message = MessageEntity {
        id: Uuid::new_v4(),
        sender_id: actor.id,
        recipient_id: request.recipient_id,
        subject: request.subject.trim().to_owned(),
        content: request.content,
        is_read: false,
        created_at: SystemTime::now(),
    };
    store.insert_message(message.clone()).await?;

    info!(message_id = %message.id, sender_id = %actor.id, recipient_id = %message.recipient_id, "message sent");
    dispatch(
        store.as_ref(),
        vec![notification(
            message.recipient_id,
            NotificationKind::MessageReceived,
            "New message",
            format!("{} sent you: {}", actor.email, message.subject),
            json!({ "message_id": message.id, "sender_id": actor.id }),
        )],
    )
    .await;

    Ok(message.into())
}

pub async fn inbox(
    state: &SharedState,
    actor: &AuthUser,
) -> Result<Vec<MessageResponse>, ServiceError> {
    list(
        state,
        MessageFilter {
            recipient_id: Some(actor.id),
            ..Default::default()
        },
    )
    .await
}

pub async fn sent(
    state: &SharedState,
    actor: &AuthUser,
) -> Result<Vec<MessageResponse>, ServiceError> {
    list(
        state,
        MessageFilter {
            sender_id: Some(actor.id),
            ..Default::default()
        },
    )
    .await
}

/// Every message, for administrators.
pub async fn list_all(state: &SharedState) -> Result<Vec<MessageResponse>, ServiceError> {
    list(state, MessageFilter::default()).await
}

async fn list(
    state: &SharedState,
    filter: MessageFilter,
) -> Result<Vec<MessageResponse>, ServiceError> {
    let store = state.require_store().await?;
    let messages = store.list_messages(filter).await?;
    Ok(messages.into_iter().map(Into::into).collect())
}

/// Only the recipient may mark a message read; others see a 404.
pub async fn mark_read(
    state: &SharedState,
    actor: &AuthUser,
    id: Uuid,
) -> Result<MessageResponse, ServiceError> {
    let store = state.require_store().await?;
    let mut message = store
        .find_message(id)
        .await?
        .filter(|message| message.recipient_id == actor.id)
        .ok_or_else(|| ServiceError::NotFound(format!("message {id} not found")))?;

    if !message.is_read {
        store.mark_message_read(id).await?;
        message.is_read = true;
    }
    Ok(message.into())
}

pub async fn delete(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if !store.delete_message(id).await? {
        return Err(ServiceError::NotFound(format!("message {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::models::Role, services::testing};

    fn hello(recipient_id: Uuid) -> SendMessageRequest {
        SendMessageRequest {
            recipient_id,
            subject: "Scrim tonight?".into(),
            content: "We need a fifth.".into(),
        }
    }

    #[tokio::test]
    async fn message_lands_in_both_mailboxes() {
        let state = testing::state().await;
        let alice = testing::user(&state, "alice", Role::User).await;
        let bob = testing::user(&state, "bob", Role::User).await;

        let sent_message = send(&state, &alice, hello(bob.id)).await.unwrap();

        assert_eq!(inbox(&state, &bob).await.unwrap()[0].id, sent_message.id);
        assert_eq!(sent(&state, &alice).await.unwrap()[0].id, sent_message.id);
        assert!(inbox(&state, &alice).await.unwrap().is_empty());

        let notifications = testing::store(&state)
            .await
            .list_notifications(bob.id, true, 10)
            .await
            .unwrap();
        assert_eq!(notifications[0].kind, NotificationKind::MessageReceived);
    }

    #[tokio::test]
    async fn self_and_unknown_recipients_are_refused() {
        let state = testing::state().await;
        let alice = testing::user(&state, "alice", Role::User).await;

        assert!(matches!(
            send(&state, &alice, hello(alice.id)).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            send(&state, &alice, hello(Uuid::new_v4())).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn only_the_recipient_marks_read() {
        let state = testing::state().await;
        let alice = testing::user(&state, "alice", Role::User).await;
        let bob = testing::user(&state, "bob", Role::User).await;
        let message = send(&state, &alice, hello(bob.id)).await.unwrap();

        assert!(matches!(
            mark_read(&state, &alice, message.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(mark_read(&state, &bob, message.id).await.unwrap().is_read);
        assert!(inbox(&state, &bob).await.unwrap()[0].is_read);
    }
}
