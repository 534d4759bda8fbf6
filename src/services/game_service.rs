use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{models::GameEntity, store::TournamentFilter},
    dto::game::{GameInput, GameResponse},
    error::ServiceError,
    state::SharedState,
};

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

pub async fn list(state: &SharedState) -> Result<Vec<GameResponse>, ServiceError> {
    let store = state.require_store().await?;
    let games = store.list_games().await?;
    Ok(games.into_iter().map(Into::into).collect())
}

pub async fn get(state: &SharedState, id: Uuid) -> Result<GameResponse, ServiceError> {
    let store = state.require_store().await?;
    let Some(game) = store.find_game(id).await? else {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };
    Ok(game.into())
}

/// Add a game to the catalogue. Names are unique.
pub async fn create(state: &SharedState, input: GameInput) -> Result<GameResponse, ServiceError> {
    let store = state.require_store().await?;
    let now = SystemTime::now();
    let game = GameEntity {
        id: Uuid::new_v4(),
        name: input.name.trim().to_owned(),
        description: trimmed(input.description),
        image_url: trimmed(input.image_url),
        created_at: now,
        updated_at: now,
    };
    store.insert_game(game.clone()).await?;

    info!(game_id = %game.id, name = %game.name, "game created");
    Ok(game.into())
}

/// Replace every editable field of a game.
pub async fn replace(
    state: &SharedState,
    id: Uuid,
    input: GameInput,
) -> Result<GameResponse, ServiceError> {
    let store = state.require_store().await?;
    let Some(existing) = store.find_game(id).await? else {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };

    let game = GameEntity {
        name: input.name.trim().to_owned(),
        description: trimmed(input.description),
        image_url: trimmed(input.image_url),
        updated_at: SystemTime::now(),
        ..existing
    };
    if !store.update_game(game.clone()).await? {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    }
    Ok(game.into())
}

/// Remove a game nobody plays anymore; refused while tournaments reference it.
pub async fn delete(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let referencing = store
        .list_tournaments(TournamentFilter {
            game_id: Some(id),
            ..Default::default()
        })
        .await?;
    if !referencing.is_empty() {
        return Err(ServiceError::InvalidState(format!(
            "game `{id}` is still used by {} tournament(s)",
            referencing.len()
        )));
    }

    if !store.delete_game(id).await? {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    }
    info!(game_id = %id, "game deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::models::Role, services::testing};

    fn input(name: &str) -> GameInput {
        GameInput {
            name: name.into(),
            description: Some("  ".into()),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn names_are_unique() {
        let state = testing::state().await;
        let created = create(&state, input(" Rocket League ")).await.unwrap();

        assert_eq!(created.name, "Rocket League");
        assert_eq!(created.description, None);
        assert!(matches!(
            create(&state, input("Rocket League")).await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn replace_keeps_identity() {
        let state = testing::state().await;
        let created = create(&state, input("Dota")).await.unwrap();

        let replaced = replace(&state, created.id, input("Dota 2")).await.unwrap();

        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.created_at, created.created_at);
        assert_eq!(get(&state, created.id).await.unwrap().name, "Dota 2");
        assert!(matches!(
            replace(&state, Uuid::new_v4(), input("Ghost")).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn referenced_games_cannot_be_deleted() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let game_id = testing::store(&state)
            .await
            .find_tournament(tid)
            .await
            .unwrap()
            .unwrap()
            .game_id;

        assert!(matches!(
            delete(&state, game_id).await,
            Err(ServiceError::InvalidState(_))
        ));

        let unused = create(&state, input("Quake")).await.unwrap();
        delete(&state, unused.id).await.unwrap();
        assert!(list(&state).await.unwrap().iter().all(|game| game.id != unused.id));
    }
}
