use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dao::{
        models::{Role, TeamRole},
        store::TournamentFilter,
    },
    dto::user::{AdminUpdateUserRequest, UserResponse},
    error::ServiceError,
    state::SharedState,
};

pub async fn list(state: &SharedState) -> Result<Vec<UserResponse>, ServiceError> {
    let store = state.require_store().await?;
    let users = store.list_users().await?;
    Ok(users.into_iter().map(Into::into).collect())
}

/// Rename an account or change its role. Admins cannot demote themselves.
pub async fn update(
    state: &SharedState,
    actor: &AuthUser,
    id: Uuid,
    request: AdminUpdateUserRequest,
) -> Result<UserResponse, ServiceError> {
    if id == actor.id && request.role.is_some_and(|role| role != Role::Admin) {
        return Err(ServiceError::InvalidState(
            "administrators cannot demote themselves".into(),
        ));
    }

    let store = state.require_store().await?;
    let mut user = store
        .find_user(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user {id} not found")))?;

    if let Some(username) = request.username {
        user.username = username.trim().to_owned();
    }
    if let Some(role) = request.role {
        user.role = role;
    }
    user.updated_at = SystemTime::now();

    if !store.update_user(user.clone()).await? {
        return Err(ServiceError::NotFound(format!("user {id} not found")));
    }
    info!(user_id = %id, role = user.role.as_str(), actor_id = %actor.id, "user updated");
    Ok(user.into())
}

/// Delete an account with everything that only makes sense with it around.
///
/// Accounts that still own tournaments or captain teams must hand those over or
/// delete them first.
pub async fn delete(state: &SharedState, actor: &AuthUser, id: Uuid) -> Result<(), ServiceError> {
    if id == actor.id {
        return Err(ServiceError::InvalidState(
            "administrators cannot delete their own account".into(),
        ));
    }

    let store = state.require_store().await?;
    if store.find_user(id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("user {id} not found")));
    }

    let owned = store
        .list_tournaments(TournamentFilter {
            creator_id: Some(id),
            ..Default::default()
        })
        .await?;
    if !owned.is_empty() {
        return Err(ServiceError::InvalidState(format!(
            "user still created {} tournament(s)",
            owned.len()
        )));
    }

    let captaincies = store
        .list_user_memberships(id)
        .await?
        .into_iter()
        .filter(|member| member.role == TeamRole::Captain)
        .count();
    if captaincies > 0 {
        return Err(ServiceError::InvalidState(format!(
            "user still captains {captaincies} team(s)"
        )));
    }

    if !store.delete_user(id).await? {
        return Err(ServiceError::NotFound(format!("user {id} not found")));
    }
    info!(user_id = %id, actor_id = %actor.id, "user deleted");
    Ok(())
}
