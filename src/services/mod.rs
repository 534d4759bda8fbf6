/// Dashboard statistics for administrators.
pub mod admin_service;
/// Registration, login and session resolution.
pub mod auth_service;
/// Public contact-form submissions and their triage.
pub mod contact_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game catalogue management.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Join request lifecycle and participant admission.
pub mod join_request_service;
/// Direct messages between users.
pub mod message_service;
/// Notification dispatch and inbox operations.
pub mod notification_service;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
/// Team formation inside tournaments.
pub mod team_service;
/// Tournament aggregate operations.
pub mod tournament_service;
/// Tournament format catalogue.
pub mod tournament_type_service;
/// Account administration.
pub mod user_service;

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the service tests.

    use std::{sync::Arc, time::{Duration, SystemTime}};

    use uuid::Uuid;

    use crate::{
        auth::{AuthUser, TokenKeys},
        config::AppConfig,
        dao::{
            models::{GameEntity, Role, UserEntity},
            store::{ArenaStore, MemoryStore},
        },
        dto::tournament::CreateTournamentRequest,
        services::tournament_service,
        state::{AppState, SharedState},
    };

    pub async fn state() -> SharedState {
        state_with(MemoryStore::new()).await
    }

    pub async fn state_with(store: MemoryStore) -> SharedState {
        AppState::with_store(
            AppConfig::default(),
            TokenKeys::from_secret(b"service-tests", Duration::from_secs(600)),
            Arc::new(store),
        )
        .await
    }

    /// Insert an account directly and return it as an authenticated caller.
    pub async fn user(state: &SharedState, username: &str, role: Role) -> AuthUser {
        let now = SystemTime::now();
        let user = UserEntity {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            email: format!("{username}@arena.test"),
            password_hash: String::new(),
            role,
            created_at: now,
            updated_at: now,
        };
        let store = state.require_store().await.unwrap();
        store.insert_user(user.clone()).await.unwrap();
        AuthUser {
            id: user.id,
            email: user.email,
            role,
            session_id: Uuid::new_v4(),
            expires_at: u64::MAX,
        }
    }

    pub async fn game(state: &SharedState) -> Uuid {
        let now = SystemTime::now();
        let game = GameEntity {
            id: Uuid::new_v4(),
            name: format!("Game {}", Uuid::new_v4()),
            description: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        let id = game.id;
        state
            .require_store()
            .await
            .unwrap()
            .insert_game(game)
            .await
            .unwrap();
        id
    }

    /// Create a tournament owned by `creator` with room for `max_participants`.
    pub async fn tournament(state: &SharedState, creator: &AuthUser, max_participants: u32) -> Uuid {
        let game_id = game(state).await;
        let created = tournament_service::create(
            state,
            creator,
            CreateTournamentRequest {
                name: "Weekly Cup".into(),
                description: None,
                game_id,
                tournament_type_id: None,
                max_participants,
                min_teams: 2,
                players_per_team: 1,
                starts_at: None,
            },
        )
        .await
        .unwrap();
        created.id
    }

    pub async fn store(state: &SharedState) -> Arc<dyn ArenaStore> {
        state.require_store().await.unwrap()
    }
}
