use std::time::SystemTime;

use serde_json::{Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dao::{
        models::{NotificationEntity, NotificationKind},
        store::ArenaStore,
    },
    dto::notification::{
        BroadcastRequest, BroadcastResponse, MarkAllReadResponse, NotificationResponse,
        UnreadCountResponse,
    },
    error::ServiceError,
    state::SharedState,
};

/// Build an unread notification row for `user_id`.
pub fn notification(
    user_id: Uuid,
    kind: NotificationKind,
    title: impl Into<String>,
    message: impl Into<String>,
    data: Value,
) -> NotificationEntity {
    NotificationEntity {
        id: Uuid::new_v4(),
        user_id,
        kind,
        title: title.into(),
        message: message.into(),
        data,
        is_read: false,
        created_at: SystemTime::now(),
    }
}

/// Insert notifications without failing the calling operation; a lost
/// notification is only logged.
pub async fn dispatch(store: &dyn ArenaStore, notifications: Vec<NotificationEntity>) {
    if notifications.is_empty() {
        return;
    }
    let count = notifications.len();
    match store.insert_notifications(notifications).await {
        Ok(()) => debug!(count, "notifications dispatched"),
        Err(err) => warn!(count, error = %err, "failed to store notifications"),
    }
}

pub async fn list_mine(
    state: &SharedState,
    actor: &AuthUser,
    unread_only: bool,
) -> Result<Vec<NotificationResponse>, ServiceError> {
    let store = state.require_store().await?;
    let rows = store
        .list_notifications(actor.id, unread_only, state.config().notification_limit)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn unread_count(
    state: &SharedState,
    actor: &AuthUser,
) -> Result<UnreadCountResponse, ServiceError> {
    let store = state.require_store().await?;
    let unread = store.count_unread_notifications(actor.id).await?;
    Ok(UnreadCountResponse { unread })
}

/// Flip the read flag of one of the caller's notifications.
pub async fn mark_read(
    state: &SharedState,
    actor: &AuthUser,
    id: Uuid,
) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if !store.mark_notification_read(actor.id, id).await? {
        return Err(ServiceError::NotFound(format!("notification {id} not found")));
    }
    Ok(())
}

pub async fn mark_all_read(
    state: &SharedState,
    actor: &AuthUser,
) -> Result<MarkAllReadResponse, ServiceError> {
    let store = state.require_store().await?;
    let updated = store.mark_all_notifications_read(actor.id).await?;
    Ok(MarkAllReadResponse { updated })
}

pub async fn delete(state: &SharedState, actor: &AuthUser, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if !store.delete_notification(actor.id, id).await? {
        return Err(ServiceError::NotFound(format!("notification {id} not found")));
    }
    Ok(())
}

/// Insert one `system` notification per target user, every account when no
/// targets are given. Unknown target ids are skipped.
pub async fn broadcast(
    state: &SharedState,
    payload: BroadcastRequest,
) -> Result<BroadcastResponse, ServiceError> {
    let store = state.require_store().await?;
    let users = store.list_users().await?;
    let targets: Vec<Uuid> = match payload.user_ids {
        Some(ids) => users
            .iter()
            .map(|user| user.id)
            .filter(|id| ids.contains(id))
            .collect(),
        None => users.iter().map(|user| user.id).collect(),
    };

    let data = payload.data.unwrap_or_else(|| json!({}));
    let rows: Vec<NotificationEntity> = targets
        .into_iter()
        .map(|user_id| {
            notification(
                user_id,
                NotificationKind::System,
                payload.title.clone(),
                payload.message.clone(),
                data.clone(),
            )
        })
        .collect();

    let delivered = rows.len() as u64;
    store.insert_notifications(rows).await?;
    Ok(BroadcastResponse { delivered })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::models::Role, services::testing};

    #[tokio::test]
    async fn notifications_are_listed_newest_first_and_marked_read() {
        let state = testing::state().await;
        let user = testing::user(&state, "reader", Role::User).await;
        let store = state.require_store().await.unwrap();

        for title in ["first", "second", "third"] {
            dispatch(
                store.as_ref(),
                vec![notification(user.id, NotificationKind::System, title, "body", json!({}))],
            )
            .await;
        }

        let listed = list_mine(&state, &user, false).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["third", "second", "first"]);
        assert_eq!(unread_count(&state, &user).await.unwrap().unread, 3);

        mark_read(&state, &user, listed[0].id).await.unwrap();
        assert_eq!(list_mine(&state, &user, true).await.unwrap().len(), 2);
        assert_eq!(mark_all_read(&state, &user).await.unwrap().updated, 2);
        assert_eq!(unread_count(&state, &user).await.unwrap().unread, 0);
    }

    #[tokio::test]
    async fn foreign_notifications_are_not_found() {
        let state = testing::state().await;
        let owner = testing::user(&state, "owner", Role::User).await;
        let other = testing::user(&state, "other", Role::User).await;
        let store = state.require_store().await.unwrap();
        let row = notification(owner.id, NotificationKind::System, "t", "m", json!({}));
        let id = row.id;
        dispatch(store.as_ref(), vec![row]).await;

        assert!(matches!(
            mark_read(&state, &other, id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            delete(&state, &other, id).await,
            Err(ServiceError::NotFound(_))
        ));
        delete(&state, &owner, id).await.unwrap();
    }

    #[tokio::test]
    async fn broadcast_reaches_every_user_or_the_selected_ones() {
        let state = testing::state().await;
        let a = testing::user(&state, "alpha", Role::User).await;
        let b = testing::user(&state, "bravo", Role::User).await;

        let all = broadcast(
            &state,
            BroadcastRequest {
                title: "Maintenance".into(),
                message: "Down at noon".into(),
                data: None,
                user_ids: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(all.delivered, 2);

        let some = broadcast(
            &state,
            BroadcastRequest {
                title: "Hi".into(),
                message: "Only you".into(),
                data: Some(json!({ "k": 1 })),
                user_ids: Some(vec![b.id, Uuid::new_v4()]),
            },
        )
        .await
        .unwrap();
        assert_eq!(some.delivered, 1);
        assert_eq!(unread_count(&state, &a).await.unwrap().unread, 1);
        assert_eq!(unread_count(&state, &b).await.unwrap().unread, 2);
    }
}
