use std::time::SystemTime;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::{
        AuthUser, TokenError,
        password::{hash_password, verify_password},
    },
    dao::models::{Role, UserEntity},
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        user::{UpdateMeRequest, UserResponse},
    },
    error::ServiceError,
    state::SharedState,
};

const BAD_CREDENTIALS: &str = "invalid email or password";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue(state: &SharedState, user: UserEntity) -> Result<AuthResponse, ServiceError> {
    let issued = state
        .tokens()
        .issue(&user)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    Ok(AuthResponse::new(issued.token, issued.claims.exp, user.into()))
}

/// Create an account and open a session for it.
///
/// The first account ever created, and the configured bootstrap address, get
/// the admin role.
pub async fn register(
    state: &SharedState,
    request: RegisterRequest,
) -> Result<AuthResponse, ServiceError> {
    let store = state.require_store().await?;
    let email = normalize_email(&request.email);

    if store.find_user_by_email(email.clone()).await?.is_some() {
        return Err(ServiceError::Conflict("email already registered".into()));
    }

    let role = if store.count_users().await? == 0 || state.config().is_bootstrap_admin(&email) {
        Role::Admin
    } else {
        Role::User
    };

    let now = SystemTime::now();
    let user = UserEntity {
        id: Uuid::new_v4(),
        username: request.username.trim().to_owned(),
        email,
        password_hash: hash_password(request.password).await?,
        role,
        created_at: now,
        updated_at: now,
    };
    store.insert_user(user.clone()).await?;

    info!(user_id = %user.id, role = role.as_str(), "account registered");
    issue(state, user)
}

pub async fn login(state: &SharedState, request: LoginRequest) -> Result<AuthResponse, ServiceError> {
    let store = state.require_store().await?;
    let Some(user) = store
        .find_user_by_email(normalize_email(&request.email))
        .await?
    else {
        return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.into()));
    };

    if !verify_password(request.password, user.password_hash.clone()).await? {
        debug!(user_id = %user.id, "password mismatch");
        return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.into()));
    }

    info!(user_id = %user.id, "user logged in");
    issue(state, user)
}

/// Revoke the caller's session until its token would have expired anyway.
pub fn logout(state: &SharedState, actor: &AuthUser) {
    state.sessions().revoke(actor.session_id, actor.expires_at);
    info!(user_id = %actor.id, session_id = %actor.session_id, "session revoked");
}

/// Resolve a bearer token into the caller, with the role currently in storage.
pub async fn authenticate(state: &SharedState, token: &str) -> Result<AuthUser, ServiceError> {
    let claims = state.tokens().verify(token).map_err(|err| match err {
        TokenError::Expired => ServiceError::Unauthorized("token expired".into()),
        _ => ServiceError::Unauthorized("invalid token".into()),
    })?;

    if state.sessions().is_revoked(claims.sid) {
        return Err(ServiceError::Unauthorized("session has been revoked".into()));
    }

    let store = state.require_store().await?;
    let user = store
        .find_user(claims.sub)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("account no longer exists".into()))?;

    Ok(AuthUser {
        id: user.id,
        email: user.email,
        role: user.role,
        session_id: claims.sid,
        expires_at: claims.exp,
    })
}

pub async fn me(state: &SharedState, actor: &AuthUser) -> Result<UserResponse, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_user(actor.id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound("account no longer exists".into()))
}

pub async fn update_me(
    state: &SharedState,
    actor: &AuthUser,
    request: UpdateMeRequest,
) -> Result<UserResponse, ServiceError> {
    let store = state.require_store().await?;
    let mut user = store
        .find_user(actor.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("account no longer exists".into()))?;

    if let Some(username) = request.username {
        user.username = username.trim().to_owned();
    }
    if let Some(password) = request.password {
        user.password_hash = hash_password(password).await?;
    }
    user.updated_at = SystemTime::now();

    if !store.update_user(user.clone()).await? {
        return Err(ServiceError::NotFound("account no longer exists".into()));
    }
    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;

    fn registration(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: "s3cret-pass".into(),
        }
    }

    #[tokio::test]
    async fn first_account_becomes_admin() {
        let state = testing::state().await;

        let first = register(&state, registration("root", "root@arena.test"))
            .await
            .unwrap();
        let second = register(&state, registration("player", "player@arena.test"))
            .await
            .unwrap();

        assert_eq!(first.user.role, Role::Admin);
        assert_eq!(second.user.role, Role::User);
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let state = testing::state().await;
        register(&state, registration("root", "Root@Arena.test"))
            .await
            .unwrap();

        assert!(matches!(
            register(&state, registration("copy", "root@arena.TEST")).await,
            Err(ServiceError::Conflict(_))
        ));

        let session = login(
            &state,
            LoginRequest {
                email: "ROOT@arena.test".into(),
                password: "s3cret-pass".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(session.user.email, "root@arena.test");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_alike() {
        let state = testing::state().await;
        register(&state, registration("root", "root@arena.test"))
            .await
            .unwrap();

        for (email, password) in [
            ("root@arena.test", "not-the-password"),
            ("ghost@arena.test", "s3cret-pass"),
        ] {
            let err = login(
                &state,
                LoginRequest {
                    email: email.into(),
                    password: password.into(),
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ServiceError::Unauthorized(message) if message == BAD_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn logout_revokes_only_that_session() {
        let state = testing::state().await;
        let first = register(&state, registration("root", "root@arena.test"))
            .await
            .unwrap();
        let second = login(
            &state,
            LoginRequest {
                email: "root@arena.test".into(),
                password: "s3cret-pass".into(),
            },
        )
        .await
        .unwrap();

        let caller = authenticate(&state, &first.token).await.unwrap();
        logout(&state, &caller);

        assert!(matches!(
            authenticate(&state, &first.token).await,
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(authenticate(&state, &second.token).await.is_ok());
    }

    #[tokio::test]
    async fn role_is_read_from_storage() {
        let state = testing::state().await;
        let session = register(&state, registration("root", "root@arena.test"))
            .await
            .unwrap();
        let store = testing::store(&state).await;
        let mut user = store.find_user(session.user.id).await.unwrap().unwrap();
        user.role = Role::User;
        store.update_user(user).await.unwrap();

        let caller = authenticate(&state, &session.token).await.unwrap();
        assert!(!caller.is_admin());
    }

    #[tokio::test]
    async fn deleted_account_can_no_longer_authenticate() {
        let state = testing::state().await;
        let session = register(&state, registration("root", "root@arena.test"))
            .await
            .unwrap();
        testing::store(&state)
            .await
            .delete_user(session.user.id)
            .await
            .unwrap();

        assert!(matches!(
            authenticate(&state, &session.token).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn password_change_applies_to_next_login() {
        let state = testing::state().await;
        let session = register(&state, registration("root", "root@arena.test"))
            .await
            .unwrap();
        let caller = authenticate(&state, &session.token).await.unwrap();

        let updated = update_me(
            &state,
            &caller,
            UpdateMeRequest {
                username: Some("admin".into()),
                password: Some("another-pass".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.username, "admin");

        let relogin = login(
            &state,
            LoginRequest {
                email: "root@arena.test".into(),
                password: "another-pass".into(),
            },
        )
        .await;
        assert!(relogin.is_ok());
    }
}
