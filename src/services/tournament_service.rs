use std::time::SystemTime;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dao::{
        models::{NotificationKind, TournamentEntity, TournamentStatus, TournamentStatusEntity},
        store::{ArenaStore, TournamentFilter},
    },
    dto::{
        parse_timestamp,
        tournament::{
            CreateTournamentRequest, ParticipantResponse, StatusHistoryEntry,
            TournamentListQuery, TournamentResponse, UpdateTournamentRequest,
        },
        validation::validate_team_layout,
    },
    error::ServiceError,
    services::notification_service::{dispatch, notification},
    state::SharedState,
};

/// Load a tournament or fail with [`ServiceError::NotFound`].
pub(crate) async fn load(
    store: &dyn ArenaStore,
    id: Uuid,
) -> Result<TournamentEntity, ServiceError> {
    store
        .find_tournament(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("tournament {id} not found")))
}

/// Latest entry of the status history.
pub(crate) async fn current_status(
    store: &dyn ArenaStore,
    id: Uuid,
) -> Result<TournamentStatus, ServiceError> {
    let history = store.list_tournament_statuses(id).await?;
    Ok(history
        .last()
        .map(|entry| entry.status)
        .unwrap_or(TournamentStatus::Upcoming))
}

/// Only admins and the tournament creator may manage a tournament.
pub(crate) fn ensure_manager(
    actor: &AuthUser,
    tournament: &TournamentEntity,
) -> Result<(), ServiceError> {
    if actor.is_admin() || actor.id == tournament.creator_id {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "only the tournament creator or an admin may do this".into(),
        ))
    }
}

async fn summarize(
    store: &dyn ArenaStore,
    tournament: TournamentEntity,
) -> Result<TournamentResponse, ServiceError> {
    let status = current_status(store, tournament.id).await?;
    let participants = store.count_participants(tournament.id).await?;
    let teams = store.list_teams(Some(tournament.id)).await?.len() as u64;
    Ok(TournamentResponse::new(tournament, status, participants, teams))
}

fn parse_starts_at(value: &str) -> Result<SystemTime, ServiceError> {
    parse_timestamp(value)
        .ok_or_else(|| ServiceError::InvalidInput(format!("`{value}` is not an RFC 3339 timestamp")))
}

pub async fn create(
    state: &SharedState,
    actor: &AuthUser,
    payload: CreateTournamentRequest,
) -> Result<TournamentResponse, ServiceError> {
    let store = state.require_store().await?;

    if store.find_game(payload.game_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "game {} not found",
            payload.game_id
        )));
    }
    if let Some(type_id) = payload.tournament_type_id {
        if store.find_tournament_type(type_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!(
                "tournament type {type_id} not found"
            )));
        }
    }
    let starts_at = payload.starts_at.as_deref().map(parse_starts_at).transpose()?;

    let now = SystemTime::now();
    let tournament = TournamentEntity {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_owned(),
        description: payload.description,
        game_id: payload.game_id,
        tournament_type_id: payload.tournament_type_id,
        creator_id: actor.id,
        max_participants: payload.max_participants,
        min_teams: payload.min_teams,
        players_per_team: payload.players_per_team,
        starts_at,
        created_at: now,
        updated_at: now,
    };
    let initial = TournamentStatusEntity {
        id: Uuid::new_v4(),
        tournament_id: tournament.id,
        status: TournamentStatus::Upcoming,
        created_at: now,
    };

    store.insert_tournament(tournament.clone(), initial).await?;
    info!(tournament_id = %tournament.id, creator_id = %actor.id, "tournament created");
    Ok(TournamentResponse::new(
        tournament,
        TournamentStatus::Upcoming,
        0,
        0,
    ))
}

pub async fn list(
    state: &SharedState,
    query: TournamentListQuery,
) -> Result<Vec<TournamentResponse>, ServiceError> {
    let store = state.require_store().await?;
    let filter = TournamentFilter {
        game_id: query.game_id,
        ..Default::default()
    };

    let mut items = Vec::new();
    for tournament in store.list_tournaments(filter).await? {
        let summary = summarize(store.as_ref(), tournament).await?;
        if query.status.is_none_or(|status| summary.status == status) {
            items.push(summary);
        }
    }
    Ok(items)
}

pub async fn get(state: &SharedState, id: Uuid) -> Result<TournamentResponse, ServiceError> {
    let store = state.require_store().await?;
    let tournament = load(store.as_ref(), id).await?;
    summarize(store.as_ref(), tournament).await
}

/// Apply a partial update. Capacity can never drop below the current roster.
pub async fn update(
    state: &SharedState,
    actor: &AuthUser,
    id: Uuid,
    payload: UpdateTournamentRequest,
) -> Result<TournamentResponse, ServiceError> {
    let store = state.require_store().await?;
    let mut tournament = load(store.as_ref(), id).await?;
    ensure_manager(actor, &tournament)?;

    if let Some(name) = payload.name {
        tournament.name = name.trim().to_owned();
    }
    if let Some(description) = payload.description {
        tournament.description = description;
    }
    if let Some(game_id) = payload.game_id {
        if store.find_game(game_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("game {game_id} not found")));
        }
        tournament.game_id = game_id;
    }
    if let Some(type_id) = payload.tournament_type_id {
        if let Some(type_id) = type_id {
            if store.find_tournament_type(type_id).await?.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "tournament type {type_id} not found"
                )));
            }
        }
        tournament.tournament_type_id = type_id;
    }
    if let Some(starts_at) = payload.starts_at {
        tournament.starts_at = starts_at.as_deref().map(parse_starts_at).transpose()?;
    }
    tournament.max_participants = payload
        .max_participants
        .unwrap_or(tournament.max_participants);
    tournament.min_teams = payload.min_teams.unwrap_or(tournament.min_teams);
    tournament.players_per_team = payload
        .players_per_team
        .unwrap_or(tournament.players_per_team);

    validate_team_layout(
        tournament.max_participants,
        tournament.min_teams,
        tournament.players_per_team,
    )
    .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let _gate = state.admission().acquire(id).await;
    let participants = store.count_participants(id).await?;
    if u64::from(tournament.max_participants) < participants {
        return Err(ServiceError::InvalidState(format!(
            "tournament already has {participants} participants"
        )));
    }

    tournament.updated_at = SystemTime::now();
    if !store.update_tournament(tournament.clone()).await? {
        return Err(ServiceError::NotFound(format!("tournament {id} not found")));
    }
    summarize(store.as_ref(), tournament).await
}

/// Append a status to the history and tell every participant about it.
pub async fn set_status(
    state: &SharedState,
    actor: &AuthUser,
    id: Uuid,
    status: TournamentStatus,
) -> Result<TournamentResponse, ServiceError> {
    let store = state.require_store().await?;
    let tournament = load(store.as_ref(), id).await?;
    ensure_manager(actor, &tournament)?;

    let previous = current_status(store.as_ref(), id).await?;
    if previous == status {
        return summarize(store.as_ref(), tournament).await;
    }

    store
        .insert_tournament_status(TournamentStatusEntity {
            id: Uuid::new_v4(),
            tournament_id: id,
            status,
            created_at: SystemTime::now(),
        })
        .await?;
    info!(
        tournament_id = %id,
        from = previous.as_str(),
        to = status.as_str(),
        "tournament status changed"
    );

    let notifications = store
        .list_participants(id)
        .await?
        .into_iter()
        .map(|participant| {
            notification(
                participant.user_id,
                NotificationKind::TournamentStatusChanged,
                "Tournament update",
                format!("{} is now {}", tournament.name, status.as_str()),
                json!({ "tournament_id": id, "status": status }),
            )
        })
        .collect();
    dispatch(store.as_ref(), notifications).await;

    summarize(store.as_ref(), tournament).await
}

pub async fn status_history(
    state: &SharedState,
    id: Uuid,
) -> Result<Vec<StatusHistoryEntry>, ServiceError> {
    let store = state.require_store().await?;
    load(store.as_ref(), id).await?;
    let history = store.list_tournament_statuses(id).await?;
    Ok(history.into_iter().map(Into::into).collect())
}

/// Remove a tournament with everything it owns in one storage operation.
pub async fn delete(state: &SharedState, actor: &AuthUser, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let tournament = load(store.as_ref(), id).await?;
    ensure_manager(actor, &tournament)?;

    let gate = state.admission().acquire(id).await;
    let deleted = store.delete_tournament(id).await?;
    drop(gate);
    state.admission().forget(id);

    if !deleted {
        return Err(ServiceError::NotFound(format!("tournament {id} not found")));
    }
    info!(tournament_id = %id, actor_id = %actor.id, "tournament deleted");
    Ok(())
}

pub async fn participants(
    state: &SharedState,
    id: Uuid,
) -> Result<Vec<ParticipantResponse>, ServiceError> {
    let store = state.require_store().await?;
    load(store.as_ref(), id).await?;

    let mut items = Vec::new();
    for participant in store.list_participants(id).await? {
        let username = store
            .find_user(participant.user_id)
            .await?
            .map(|user| user.username)
            .unwrap_or_default();
        items.push(ParticipantResponse::new(participant, username));
    }
    Ok(items)
}
