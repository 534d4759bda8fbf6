use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{models::TournamentTypeEntity, store::TournamentFilter},
    dto::game::{TournamentTypeInput, TournamentTypeResponse},
    error::ServiceError,
    state::SharedState,
};

pub async fn list(state: &SharedState) -> Result<Vec<TournamentTypeResponse>, ServiceError> {
    let store = state.require_store().await?;
    let kinds = store.list_tournament_types().await?;
    Ok(kinds.into_iter().map(Into::into).collect())
}

pub async fn create(
    state: &SharedState,
    input: TournamentTypeInput,
) -> Result<TournamentTypeResponse, ServiceError> {
    let store = state.require_store().await?;
    let kind = TournamentTypeEntity {
        id: Uuid::new_v4(),
        name: input.name.trim().to_owned(),
        description: input
            .description
            .map(|description| description.trim().to_owned())
            .filter(|description| !description.is_empty()),
    };
    store.insert_tournament_type(kind.clone()).await?;

    info!(tournament_type_id = %kind.id, name = %kind.name, "tournament type created");
    Ok(kind.into())
}

/// Refused while a tournament still uses the format.
pub async fn delete(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let referencing = store
        .list_tournaments(TournamentFilter {
            tournament_type_id: Some(id),
            ..Default::default()
        })
        .await?;
    if !referencing.is_empty() {
        return Err(ServiceError::InvalidState(format!(
            "tournament type `{id}` is still used by {} tournament(s)",
            referencing.len()
        )));
    }

    if !store.delete_tournament_type(id).await? {
        return Err(ServiceError::NotFound(format!(
            "tournament type `{id}` not found"
        )));
    }
    Ok(())
}
