use std::time::SystemTime;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dao::{
        models::{NotificationKind, TeamEntity, TeamMemberEntity, TeamRole, TournamentEntity},
        store::ArenaStore,
    },
    dto::team::{TeamMemberResponse, TeamResponse},
    error::ServiceError,
    services::{
        notification_service::{dispatch, notification},
        tournament_service::load as load_tournament,
    },
    state::SharedState,
};

async fn load(store: &dyn ArenaStore, id: Uuid) -> Result<TeamEntity, ServiceError> {
    store
        .find_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team {id} not found")))
}

fn ensure_captain(actor: &AuthUser, team: &TeamEntity) -> Result<(), ServiceError> {
    if actor.id == team.captain_id {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "only the team captain may do this".into(),
        ))
    }
}

async fn ensure_participant(
    store: &dyn ArenaStore,
    tournament: &TournamentEntity,
    user_id: Uuid,
) -> Result<(), ServiceError> {
    if store.find_participant(tournament.id, user_id).await?.is_none() {
        return Err(ServiceError::Forbidden(format!(
            "user {user_id} is not a participant of {}",
            tournament.name
        )));
    }
    Ok(())
}

/// The membership `user_id` holds in any team of `tournament_id`, pending included.
async fn membership_in(
    store: &dyn ArenaStore,
    tournament_id: Uuid,
    user_id: Uuid,
) -> Result<Option<TeamMemberEntity>, ServiceError> {
    for member in store.list_user_memberships(user_id).await? {
        let team = store.find_team(member.team_id).await?;
        if team.is_some_and(|team| team.tournament_id == tournament_id) {
            return Ok(Some(member));
        }
    }
    Ok(None)
}

async fn roster(store: &dyn ArenaStore, team: TeamEntity) -> Result<TeamResponse, ServiceError> {
    let mut members = store.list_team_members(team.id).await?;
    members.sort_by_key(|member| (member.role != TeamRole::Captain, member.created_at));

    let mut entries = Vec::with_capacity(members.len());
    for member in members {
        let username = store
            .find_user(member.user_id)
            .await?
            .map(|user| user.username)
            .unwrap_or_default();
        entries.push(TeamMemberResponse::new(member, username));
    }
    Ok(TeamResponse::new(team, entries))
}

/// Found a team inside a tournament; the caller becomes its captain.
pub async fn create(
    state: &SharedState,
    actor: &AuthUser,
    tournament_id: Uuid,
    name: String,
) -> Result<TeamResponse, ServiceError> {
    let store = state.require_store().await?;
    let tournament = load_tournament(store.as_ref(), tournament_id).await?;
    // Held until the insert so a concurrent revocation cannot slip in between.
    let _gate = state.admission().acquire(tournament_id).await;
    ensure_participant(store.as_ref(), &tournament, actor.id).await?;
    if membership_in(store.as_ref(), tournament_id, actor.id)
        .await?
        .is_some()
    {
        return Err(ServiceError::InvalidState(
            "already on a team in this tournament".into(),
        ));
    }

    let now = SystemTime::now();
    let team = TeamEntity {
        id: Uuid::new_v4(),
        tournament_id,
        name: name.trim().to_owned(),
        captain_id: actor.id,
        created_at: now,
    };
    let captain = TeamMemberEntity {
        id: Uuid::new_v4(),
        team_id: team.id,
        user_id: actor.id,
        role: TeamRole::Captain,
        created_at: now,
    };
    store.insert_team(team.clone(), captain).await?;

    info!(team_id = %team.id, tournament_id = %tournament_id, captain_id = %actor.id, "team created");
    roster(store.as_ref(), team).await
}

pub async fn list(
    state: &SharedState,
    tournament_id: Option<Uuid>,
) -> Result<Vec<TeamResponse>, ServiceError> {
    let store = state.require_store().await?;
    let teams = store.list_teams(tournament_id).await?;
    let mut responses = Vec::with_capacity(teams.len());
    for team in teams {
        responses.push(roster(store.as_ref(), team).await?);
    }
    Ok(responses)
}

pub async fn get(state: &SharedState, id: Uuid) -> Result<TeamResponse, ServiceError> {
    let store = state.require_store().await?;
    let team = load(store.as_ref(), id).await?;
    roster(store.as_ref(), team).await
}

/// Ask the captain for a spot on the team.
pub async fn request_join(
    state: &SharedState,
    actor: &AuthUser,
    team_id: Uuid,
) -> Result<TeamResponse, ServiceError> {
    let store = state.require_store().await?;
    let team = load(store.as_ref(), team_id).await?;
    let tournament = load_tournament(store.as_ref(), team.tournament_id).await?;
    let gate = state.admission().acquire(team.tournament_id).await;
    ensure_participant(store.as_ref(), &tournament, actor.id).await?;
    if membership_in(store.as_ref(), team.tournament_id, actor.id)
        .await?
        .is_some()
    {
        return Err(ServiceError::InvalidState(
            "already on a team in this tournament".into(),
        ));
    }

    store
        .insert_team_member(TeamMemberEntity {
            id: Uuid::new_v4(),
            team_id,
            user_id: actor.id,
            role: TeamRole::Pending,
            created_at: SystemTime::now(),
        })
        .await?;
    drop(gate);

    dispatch(
        store.as_ref(),
        vec![notification(
            team.captain_id,
            NotificationKind::TeamJoinRequested,
            "Team join request",
            format!("{} asked to join {}", actor.email, team.name),
            json!({ "team_id": team_id, "user_id": actor.id }),
        )],
    )
    .await;

    roster(store.as_ref(), team).await
}

/// Captain-only: admit a pending member or add a participant directly.
pub async fn add_member(
    state: &SharedState,
    actor: &AuthUser,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<TeamResponse, ServiceError> {
    let store = state.require_store().await?;
    let team = load(store.as_ref(), team_id).await?;
    ensure_captain(actor, &team)?;
    let tournament = load_tournament(store.as_ref(), team.tournament_id).await?;
    if store.find_participant(tournament.id, user_id).await?.is_none() {
        return Err(ServiceError::InvalidState(format!(
            "user {user_id} is not a participant of {}",
            tournament.name
        )));
    }

    // Shares the tournament gate so roster size checks do not interleave.
    let _gate = state.admission().acquire(tournament.id).await;

    let existing = membership_in(store.as_ref(), tournament.id, user_id).await?;
    if let Some(member) = &existing {
        if member.team_id != team_id {
            return Err(ServiceError::InvalidState(
                "user is already on another team in this tournament".into(),
            ));
        }
        if member.role.is_active() {
            return Err(ServiceError::InvalidState(
                "user is already a member of this team".into(),
            ));
        }
    }

    let active = store
        .list_team_members(team_id)
        .await?
        .iter()
        .filter(|member| member.role.is_active())
        .count();
    if active as u64 >= u64::from(tournament.players_per_team) {
        return Err(ServiceError::InvalidState("team is full".into()));
    }

    match existing {
        Some(_) => {
            store
                .update_team_member_role(team_id, user_id, TeamRole::Member)
                .await?;
        }
        None => {
            store
                .insert_team_member(TeamMemberEntity {
                    id: Uuid::new_v4(),
                    team_id,
                    user_id,
                    role: TeamRole::Member,
                    created_at: SystemTime::now(),
                })
                .await?;
        }
    }

    info!(team_id = %team_id, user_id = %user_id, "team member added");
    dispatch(
        store.as_ref(),
        vec![notification(
            user_id,
            NotificationKind::TeamMemberAdded,
            "Added to a team",
            format!("You are now a member of {}", team.name),
            json!({ "team_id": team_id, "tournament_id": tournament.id }),
        )],
    )
    .await;

    roster(store.as_ref(), team).await
}

/// Captains remove others, members remove themselves. Captains cannot leave.
pub async fn remove_member(
    state: &SharedState,
    actor: &AuthUser,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let team = load(store.as_ref(), team_id).await?;

    if user_id == team.captain_id {
        return Err(ServiceError::InvalidState(
            "the captain cannot leave the team; delete it instead".into(),
        ));
    }
    if user_id != actor.id {
        ensure_captain(actor, &team)?;
    }

    if !store.delete_team_member(team_id, user_id).await? {
        return Err(ServiceError::NotFound(format!(
            "user {user_id} is not on team {team_id}"
        )));
    }
    info!(team_id = %team_id, user_id = %user_id, actor_id = %actor.id, "team member removed");

    if user_id != actor.id {
        dispatch(
            store.as_ref(),
            vec![notification(
                user_id,
                NotificationKind::TeamMemberRemoved,
                "Removed from a team",
                format!("You were removed from {}", team.name),
                json!({ "team_id": team_id, "tournament_id": team.tournament_id }),
            )],
        )
        .await;
    }
    Ok(())
}

pub async fn rename(
    state: &SharedState,
    actor: &AuthUser,
    team_id: Uuid,
    name: String,
) -> Result<TeamResponse, ServiceError> {
    let store = state.require_store().await?;
    let mut team = load(store.as_ref(), team_id).await?;
    ensure_captain(actor, &team)?;

    team.name = name.trim().to_owned();
    if !store.rename_team(team_id, team.name.clone()).await? {
        return Err(ServiceError::NotFound(format!("team {team_id} not found")));
    }
    roster(store.as_ref(), team).await
}

/// Captain, tournament creator or admin. Memberships go with the team.
pub async fn delete(state: &SharedState, actor: &AuthUser, team_id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let team = load(store.as_ref(), team_id).await?;
    if actor.id != team.captain_id && !actor.is_admin() {
        let tournament = load_tournament(store.as_ref(), team.tournament_id).await?;
        if tournament.creator_id != actor.id {
            return Err(ServiceError::Forbidden(
                "only the captain, the tournament creator or an admin may delete a team".into(),
            ));
        }
    }

    if !store.delete_team(team_id).await? {
        return Err(ServiceError::NotFound(format!("team {team_id} not found")));
    }
    info!(team_id = %team_id, actor_id = %actor.id, "team deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::{JoinRequestStatus, Role},
        services::{join_request_service, testing},
    };

    /// Tournament with three players per team and `names` already admitted.
    async fn setup(
        state: &SharedState,
        names: &[&str],
    ) -> (AuthUser, Uuid, Vec<AuthUser>) {
        let creator = testing::user(state, "creator", Role::User).await;
        let tid = testing::tournament(state, &creator, 8).await;
        let store = testing::store(state).await;
        let mut tournament = store.find_tournament(tid).await.unwrap().unwrap();
        tournament.players_per_team = 3;
        store.update_tournament(tournament).await.unwrap();

        let mut players = Vec::new();
        for name in names {
            let player = testing::user(state, name, Role::User).await;
            let request = join_request_service::request_join(state, &player, tid)
                .await
                .unwrap();
            join_request_service::set_status(state, &creator, request.id, JoinRequestStatus::Accepted)
                .await
                .unwrap();
            players.push(player);
        }
        (creator, tid, players)
    }

    #[tokio::test]
    async fn only_participants_found_teams_once() {
        let state = testing::state().await;
        let (creator, tid, players) = setup(&state, &["alice"]).await;

        assert!(matches!(
            create(&state, &creator, tid, "Outsiders".into()).await,
            Err(ServiceError::Forbidden(_))
        ));

        let team = create(&state, &players[0], tid, "Falcons".into()).await.unwrap();
        assert_eq!(team.captain_id, players[0].id);
        assert_eq!(team.members.len(), 1);
        assert_eq!(team.members[0].role, TeamRole::Captain);
        assert_eq!(team.members[0].username, "alice");

        assert!(matches!(
            create(&state, &players[0], tid, "Falcons II".into()).await,
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn team_names_are_unique_per_tournament() {
        let state = testing::state().await;
        let (_, tid, players) = setup(&state, &["alice", "bob"]).await;
        create(&state, &players[0], tid, "Falcons".into()).await.unwrap();

        assert!(matches!(
            create(&state, &players[1], tid, "Falcons".into()).await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn pending_members_are_promoted_until_the_team_is_full() {
        let state = testing::state().await;
        let (_, tid, players) = setup(&state, &["alice", "bob", "carol", "dave"]).await;
        let [captain, bob, carol, dave] = players.as_slice() else {
            unreachable!()
        };
        let team = create(&state, captain, tid, "Falcons".into()).await.unwrap();

        let pending = request_join(&state, bob, team.id).await.unwrap();
        assert_eq!(pending.members[1].role, TeamRole::Pending);
        let store = testing::store(&state).await;
        let inbox = store.list_notifications(captain.id, false, 10).await.unwrap();
        assert_eq!(inbox[0].kind, NotificationKind::TeamJoinRequested);

        assert!(matches!(
            add_member(&state, bob, team.id, bob.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        let promoted = add_member(&state, captain, team.id, bob.id).await.unwrap();
        assert!(promoted.members.iter().all(|member| member.role.is_active()));
        add_member(&state, captain, team.id, carol.id).await.unwrap();

        assert!(matches!(
            add_member(&state, captain, team.id, dave.id).await,
            Err(ServiceError::InvalidState(message)) if message == "team is full"
        ));
        let inbox = store.list_notifications(carol.id, false, 10).await.unwrap();
        assert_eq!(inbox[0].kind, NotificationKind::TeamMemberAdded);
    }

    #[tokio::test]
    async fn members_leave_and_captains_stay() {
        let state = testing::state().await;
        let (_, tid, players) = setup(&state, &["alice", "bob", "carol"]).await;
        let [captain, bob, carol] = players.as_slice() else {
            unreachable!()
        };
        let team = create(&state, captain, tid, "Falcons".into()).await.unwrap();
        add_member(&state, captain, team.id, bob.id).await.unwrap();
        add_member(&state, captain, team.id, carol.id).await.unwrap();

        remove_member(&state, bob, team.id, bob.id).await.unwrap();
        assert!(matches!(
            remove_member(&state, carol, team.id, captain.id).await,
            Err(ServiceError::InvalidState(_))
        ));
        assert!(matches!(
            remove_member(&state, captain, team.id, captain.id).await,
            Err(ServiceError::InvalidState(_))
        ));

        remove_member(&state, captain, team.id, carol.id).await.unwrap();
        let store = testing::store(&state).await;
        let inbox = store.list_notifications(carol.id, false, 10).await.unwrap();
        assert_eq!(inbox[0].kind, NotificationKind::TeamMemberRemoved);
        assert!(store.list_notifications(bob.id, false, 10).await.unwrap().iter().all(
            |notification| notification.kind != NotificationKind::TeamMemberRemoved
        ));
        assert_eq!(get(&state, team.id).await.unwrap().members.len(), 1);
    }

    #[tokio::test]
    async fn tournament_creator_can_delete_a_team() {
        let state = testing::state().await;
        let (creator, tid, players) = setup(&state, &["alice", "bob"]).await;
        let team = create(&state, &players[0], tid, "Falcons".into()).await.unwrap();

        assert!(matches!(
            delete(&state, &players[1], team.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        delete(&state, &creator, team.id).await.unwrap();

        let store = testing::store(&state).await;
        assert!(store.list_team_members(team.id).await.unwrap().is_empty());
        assert!(list(&state, Some(tid)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_is_captain_only() {
        let state = testing::state().await;
        let (creator, tid, players) = setup(&state, &["alice"]).await;
        let team = create(&state, &players[0], tid, "Falcons".into()).await.unwrap();

        assert!(matches!(
            rename(&state, &creator, team.id, "Hawks".into()).await,
            Err(ServiceError::Forbidden(_))
        ));
        let renamed = rename(&state, &players[0], team.id, " Hawks ".into()).await.unwrap();
        assert_eq!(renamed.name, "Hawks");
    }
}
