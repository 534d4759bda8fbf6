use std::time::SystemTime;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    dao::{
        models::{
            JoinRequestEntity, JoinRequestFilter, JoinRequestStatus, NotificationKind,
            ParticipantEntity, TournamentEntity,
        },
        store::ArenaStore,
    },
    dto::join_request::JoinRequestResponse,
    error::ServiceError,
    services::{
        notification_service::{dispatch, notification},
        tournament_service::{current_status, ensure_manager, load},
    },
    state::{
        SharedState,
        lifecycle::{self, RequestOutcome, Transition},
    },
};

async fn load_request(
    store: &dyn ArenaStore,
    id: Uuid,
) -> Result<JoinRequestEntity, ServiceError> {
    store
        .find_join_request(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("join request {id} not found")))
}

/// Ask to take part in a tournament. A rejected request is reopened instead of
/// duplicated; capacity is only checked on acceptance.
pub async fn request_join(
    state: &SharedState,
    actor: &AuthUser,
    tournament_id: Uuid,
) -> Result<JoinRequestResponse, ServiceError> {
    let store = state.require_store().await?;
    let tournament = load(store.as_ref(), tournament_id).await?;

    let status = current_status(store.as_ref(), tournament_id).await?;
    if !status.accepts_requests() {
        return Err(ServiceError::InvalidState(format!(
            "tournament is {} and no longer accepts join requests",
            status.as_str()
        )));
    }

    let existing = store.find_join_request_for(tournament_id, actor.id).await?;
    let request = match lifecycle::on_request(existing.as_ref().map(|request| request.status))? {
        RequestOutcome::Create => {
            let now = SystemTime::now();
            let request = JoinRequestEntity {
                id: Uuid::new_v4(),
                tournament_id,
                user_id: actor.id,
                status: JoinRequestStatus::Pending,
                created_at: now,
                updated_at: now,
            };
            store.insert_join_request(request.clone()).await?;
            request
        }
        RequestOutcome::Reopen => {
            let Some(mut request) = existing else {
                return Err(ServiceError::Internal(
                    "reopen planned without an existing request".into(),
                ));
            };
            store
                .update_join_request_status(request.id, JoinRequestStatus::Pending)
                .await?;
            request.status = JoinRequestStatus::Pending;
            request.updated_at = SystemTime::now();
            request
        }
    };

    info!(
        request_id = %request.id,
        tournament_id = %tournament_id,
        user_id = %actor.id,
        "join request submitted"
    );
    dispatch(
        store.as_ref(),
        vec![notification(
            tournament.creator_id,
            NotificationKind::JoinRequestReceived,
            "New join request",
            format!("{} wants to join {}", actor.email, tournament.name),
            json!({ "tournament_id": tournament_id, "request_id": request.id, "user_id": actor.id }),
        )],
    )
    .await;

    Ok(request.into())
}

/// Capacity check followed by the participant insert.
///
/// The two steps race with concurrent admissions for the same tournament;
/// callers hold the tournament's admission gate around this call.
pub(crate) async fn admit_participant(
    store: &dyn ArenaStore,
    tournament: &TournamentEntity,
    user_id: Uuid,
) -> Result<(), ServiceError> {
    let admitted = store.count_participants(tournament.id).await?;
    if admitted >= u64::from(tournament.max_participants) {
        return Err(ServiceError::InvalidState("tournament is full".into()));
    }

    store
        .insert_participant(ParticipantEntity {
            id: Uuid::new_v4(),
            tournament_id: tournament.id,
            user_id,
            created_at: SystemTime::now(),
        })
        .await?;
    Ok(())
}

/// Moderate a join request. Shared by the admin and the tournament-scoped routes.
pub async fn set_status(
    state: &SharedState,
    actor: &AuthUser,
    request_id: Uuid,
    target: JoinRequestStatus,
) -> Result<JoinRequestResponse, ServiceError> {
    let store = state.require_store().await?;
    let request = load_request(store.as_ref(), request_id).await?;
    let tournament = load(store.as_ref(), request.tournament_id).await?;
    ensure_manager(actor, &tournament)?;

    let _gate = state.admission().acquire(tournament.id).await;
    // Re-read under the gate: a concurrent decision or capacity change may have
    // landed meanwhile.
    let mut request = load_request(store.as_ref(), request_id).await?;
    let tournament = load(store.as_ref(), request.tournament_id).await?;
    let transition = lifecycle::plan(request.status, target)?;

    let kind = match transition {
        Transition::Unchanged => return Ok(request.into()),
        Transition::Admit => {
            admit_participant(store.as_ref(), &tournament, request.user_id).await?;
            if let Err(err) = store
                .update_join_request_status(request.id, JoinRequestStatus::Accepted)
                .await
            {
                if let Err(undo) = store
                    .delete_participant(tournament.id, request.user_id)
                    .await
                {
                    warn!(
                        request_id = %request.id,
                        error = %undo,
                        "failed to roll back participant after status update failure"
                    );
                }
                return Err(err.into());
            }
            NotificationKind::JoinRequestAccepted
        }
        Transition::Reject => {
            store
                .update_join_request_status(request.id, JoinRequestStatus::Rejected)
                .await?;
            NotificationKind::JoinRequestRejected
        }
        Transition::Revoke => {
            store
                .update_join_request_status(request.id, JoinRequestStatus::Rejected)
                .await?;
            if let Err(err) = store
                .delete_participant(tournament.id, request.user_id)
                .await
            {
                if let Err(undo) = store
                    .update_join_request_status(request.id, JoinRequestStatus::Accepted)
                    .await
                {
                    warn!(
                        request_id = %request.id,
                        error = %undo,
                        "failed to restore acceptance after participant removal failure"
                    );
                }
                return Err(err.into());
            }
            NotificationKind::JoinRequestRejected
        }
    };

    request.status = target;
    request.updated_at = SystemTime::now();
    info!(
        request_id = %request.id,
        tournament_id = %tournament.id,
        status = target.as_str(),
        actor_id = %actor.id,
        "join request moderated"
    );

    let (title, verb) = match kind {
        NotificationKind::JoinRequestAccepted => ("Join request accepted", "accepted"),
        _ => ("Join request rejected", "rejected"),
    };
    dispatch(
        store.as_ref(),
        vec![notification(
            request.user_id,
            kind,
            title,
            format!("Your request to join {} was {verb}", tournament.name),
            json!({ "tournament_id": tournament.id, "request_id": request.id }),
        )],
    )
    .await;

    Ok(request.into())
}

/// [`set_status`] for a request reached through its tournament's URL.
pub async fn set_status_in(
    state: &SharedState,
    actor: &AuthUser,
    tournament_id: Uuid,
    request_id: Uuid,
    target: JoinRequestStatus,
) -> Result<JoinRequestResponse, ServiceError> {
    let store = state.require_store().await?;
    let request = load_request(store.as_ref(), request_id).await?;
    if request.tournament_id != tournament_id {
        return Err(ServiceError::NotFound(format!(
            "join request {request_id} not found in tournament {tournament_id}"
        )));
    }
    set_status(state, actor, request_id, target).await
}

/// Admin removal of a request; an accepted one takes its participant row along.
pub async fn delete_request(
    state: &SharedState,
    actor: &AuthUser,
    request_id: Uuid,
) -> Result<(), ServiceError> {
    if !actor.is_admin() {
        return Err(ServiceError::Forbidden("admin role required".into()));
    }
    let store = state.require_store().await?;
    let tournament_id = load_request(store.as_ref(), request_id)
        .await?
        .tournament_id;

    let _gate = state.admission().acquire(tournament_id).await;
    let request = load_request(store.as_ref(), request_id).await?;
    if request.status == JoinRequestStatus::Accepted {
        store
            .delete_participant(request.tournament_id, request.user_id)
            .await?;
    }
    if !store.delete_join_request(request_id).await? {
        return Err(ServiceError::NotFound(format!(
            "join request {request_id} not found"
        )));
    }
    info!(request_id = %request_id, "join request deleted");
    Ok(())
}

/// Requests of one tournament, for its creator or an admin.
pub async fn list_for_tournament(
    state: &SharedState,
    actor: &AuthUser,
    tournament_id: Uuid,
) -> Result<Vec<JoinRequestResponse>, ServiceError> {
    let store = state.require_store().await?;
    let tournament = load(store.as_ref(), tournament_id).await?;
    ensure_manager(actor, &tournament)?;

    let requests = store
        .list_join_requests(JoinRequestFilter {
            tournament_id: Some(tournament_id),
            ..Default::default()
        })
        .await?;
    Ok(requests.into_iter().map(Into::into).collect())
}

pub async fn list_mine(
    state: &SharedState,
    actor: &AuthUser,
) -> Result<Vec<JoinRequestResponse>, ServiceError> {
    let store = state.require_store().await?;
    let requests = store
        .list_join_requests(JoinRequestFilter {
            user_id: Some(actor.id),
            ..Default::default()
        })
        .await?;
    Ok(requests.into_iter().map(Into::into).collect())
}

pub async fn list_all(
    state: &SharedState,
    status: Option<JoinRequestStatus>,
) -> Result<Vec<JoinRequestResponse>, ServiceError> {
    let store = state.require_store().await?;
    let requests = store
        .list_join_requests(JoinRequestFilter {
            status,
            ..Default::default()
        })
        .await?;
    Ok(requests.into_iter().map(Into::into).collect())
}

/// Withdraw one of the caller's own pending requests.
pub async fn cancel_mine(
    state: &SharedState,
    actor: &AuthUser,
    request_id: Uuid,
) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let request = load_request(store.as_ref(), request_id).await?;
    if request.user_id != actor.id {
        return Err(ServiceError::NotFound(format!(
            "join request {request_id} not found"
        )));
    }

    let _gate = state.admission().acquire(request.tournament_id).await;
    let request = load_request(store.as_ref(), request_id).await?;
    if request.status != JoinRequestStatus::Pending {
        return Err(ServiceError::InvalidState(format!(
            "only pending requests can be withdrawn, this one is {}",
            request.status.as_str()
        )));
    }
    store.delete_join_request(request_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        dao::{
            models::{Role, TournamentStatus},
            store::MemoryStore,
        },
        dto::tournament::UpdateTournamentRequest,
        services::{team_service, testing, tournament_service},
    };

    async fn pending(state: &SharedState, tournament_id: Uuid, name: &str) -> (AuthUser, Uuid) {
        let user = testing::user(state, name, Role::User).await;
        let request = request_join(state, &user, tournament_id).await.unwrap();
        (user, request.id)
    }

    #[tokio::test]
    async fn accepting_creates_a_participant_and_notifies() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;
        let store = testing::store(&state).await;

        let creator_inbox = store.list_notifications(creator.id, false, 10).await.unwrap();
        assert_eq!(creator_inbox[0].kind, NotificationKind::JoinRequestReceived);

        let accepted = set_status(&state, &creator, request_id, JoinRequestStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.status, JoinRequestStatus::Accepted);
        assert!(store.find_participant(tid, player.id).await.unwrap().is_some());

        let inbox = store.list_notifications(player.id, false, 10).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::JoinRequestAccepted);
    }

    #[tokio::test]
    async fn duplicate_requests_conflict_until_rejected() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;

        assert!(matches!(
            request_join(&state, &player, tid).await,
            Err(ServiceError::Conflict(_))
        ));

        set_status(&state, &creator, request_id, JoinRequestStatus::Rejected)
            .await
            .unwrap();
        let reopened = request_join(&state, &player, tid).await.unwrap();

        assert_eq!(reopened.id, request_id);
        assert_eq!(reopened.status, JoinRequestStatus::Pending);
        assert_eq!(list_mine(&state, &player).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn revoking_an_acceptance_removes_the_participant() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;
        let store = testing::store(&state).await;

        set_status(&state, &creator, request_id, JoinRequestStatus::Accepted)
            .await
            .unwrap();
        set_status(&state, &creator, request_id, JoinRequestStatus::Rejected)
            .await
            .unwrap();

        assert!(store.find_participant(tid, player.id).await.unwrap().is_none());
        assert!(matches!(
            set_status(&state, &creator, request_id, JoinRequestStatus::Accepted).await,
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn repeated_decision_is_a_silent_no_op() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;
        let store = testing::store(&state).await;

        set_status(&state, &creator, request_id, JoinRequestStatus::Accepted)
            .await
            .unwrap();
        set_status(&state, &creator, request_id, JoinRequestStatus::Accepted)
            .await
            .unwrap();

        assert_eq!(store.count_participants(tid).await.unwrap(), 1);
        assert_eq!(
            store.list_notifications(player.id, false, 10).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn pending_target_is_bad_input() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (_, request_id) = pending(&state, tid, "player").await;

        assert!(matches!(
            set_status(&state, &creator, request_id, JoinRequestStatus::Pending).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn outsiders_get_forbidden_and_change_nothing() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let outsider = testing::user(&state, "outsider", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;
        let store = testing::store(&state).await;

        for target in [JoinRequestStatus::Accepted, JoinRequestStatus::Rejected] {
            assert!(matches!(
                set_status(&state, &outsider, request_id, target).await,
                Err(ServiceError::Forbidden(_))
            ));
        }

        let request = store.find_join_request(request_id).await.unwrap().unwrap();
        assert_eq!(request.status, JoinRequestStatus::Pending);
        assert!(store.find_participant(tid, player.id).await.unwrap().is_none());
        assert!(matches!(
            list_for_tournament(&state, &outsider, tid).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn last_slot_goes_to_the_first_acceptance() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 10).await;

        for index in 0..9 {
            let (_, request_id) = pending(&state, tid, &format!("early{index}")).await;
            set_status(&state, &creator, request_id, JoinRequestStatus::Accepted)
                .await
                .unwrap();
        }

        let (_, last_slot) = pending(&state, tid, "ninth").await;
        let (_, too_late) = pending(&state, tid, "tenth").await;
        set_status(&state, &creator, last_slot, JoinRequestStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(
            testing::store(&state).await.count_participants(tid).await.unwrap(),
            10
        );

        let full = set_status(&state, &creator, too_late, JoinRequestStatus::Accepted).await;
        assert!(matches!(full, Err(ServiceError::InvalidState(message)) if message == "tournament is full"));
        let request = testing::store(&state)
            .await
            .find_join_request(too_late)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.status, JoinRequestStatus::Pending);
    }

    #[tokio::test]
    async fn ungated_admissions_race_past_capacity() {
        let store = MemoryStore::with_latency(Duration::from_millis(20));
        let state = testing::state_with(store.clone()).await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 2).await;
        let tournament = store.find_tournament(tid).await.unwrap().unwrap();
        admit_participant(&store, &tournament, Uuid::new_v4())
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            admit_participant(&store, &tournament, Uuid::new_v4()),
            admit_participant(&store, &tournament, Uuid::new_v4()),
        );

        // Both saw one free slot before either inserted.
        assert!(first.is_ok() && second.is_ok());
        assert_eq!(store.count_participants(tid).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn gated_acceptances_respect_capacity() {
        let store = MemoryStore::with_latency(Duration::from_millis(20));
        let state = testing::state_with(store.clone()).await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 2).await;
        let (_, first) = pending(&state, tid, "first").await;
        set_status(&state, &creator, first, JoinRequestStatus::Accepted)
            .await
            .unwrap();
        let (_, a) = pending(&state, tid, "a").await;
        let (_, b) = pending(&state, tid, "b").await;

        let (left, right) = tokio::join!(
            set_status(&state, &creator, a, JoinRequestStatus::Accepted),
            set_status(&state, &creator, b, JoinRequestStatus::Accepted),
        );

        let outcomes = [left, right];
        let accepted = outcomes.iter().filter(|result| result.is_ok()).count();
        let full = outcomes
            .iter()
            .filter(|result| matches!(result, Err(ServiceError::InvalidState(_))))
            .count();
        assert_eq!((accepted, full), (1, 1));
        assert_eq!(store.count_participants(tid).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn deleting_an_accepted_request_removes_the_participant() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let admin = testing::user(&state, "admin", Role::Admin).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;
        let store = testing::store(&state).await;
        set_status(&state, &creator, request_id, JoinRequestStatus::Accepted)
            .await
            .unwrap();

        assert!(matches!(
            delete_request(&state, &creator, request_id).await,
            Err(ServiceError::Forbidden(_))
        ));
        delete_request(&state, &admin, request_id).await.unwrap();

        assert!(store.find_join_request(request_id).await.unwrap().is_none());
        assert!(store.find_participant(tid, player.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoked_captain_takes_their_team_along() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;
        let store = testing::store(&state).await;
        set_status(&state, &creator, request_id, JoinRequestStatus::Accepted)
            .await
            .unwrap();
        let team = team_service::create(&state, &player, tid, "Night Owls".into())
            .await
            .unwrap();

        set_status(&state, &creator, request_id, JoinRequestStatus::Rejected)
            .await
            .unwrap();

        assert!(store.find_participant(tid, player.id).await.unwrap().is_none());
        assert!(store.find_team(team.id).await.unwrap().is_none());
        assert!(store.list_team_members(team.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_request_leaves_no_team_membership() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let admin = testing::user(&state, "admin", Role::Admin).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let store = testing::store(&state).await;
        let mut tournament = store.find_tournament(tid).await.unwrap().unwrap();
        tournament.players_per_team = 2;
        store.update_tournament(tournament).await.unwrap();

        let (captain, captain_request) = pending(&state, tid, "captain").await;
        let (player, player_request) = pending(&state, tid, "player").await;
        for request_id in [captain_request, player_request] {
            set_status(&state, &creator, request_id, JoinRequestStatus::Accepted)
                .await
                .unwrap();
        }
        let team = team_service::create(&state, &captain, tid, "Red".into())
            .await
            .unwrap();
        team_service::add_member(&state, &captain, team.id, player.id)
            .await
            .unwrap();

        delete_request(&state, &admin, player_request).await.unwrap();

        let roster = team_service::get(&state, team.id).await.unwrap();
        assert_eq!(roster.members.len(), 1);
        assert_eq!(roster.members[0].user_id, captain.id);
        assert!(store.find_team_member(team.id, player.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_delete_and_accept_leave_no_orphan_participant() {
        let store = MemoryStore::with_latency(Duration::from_millis(20));
        let state = testing::state_with(store.clone()).await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let admin = testing::user(&state, "admin", Role::Admin).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;

        let (deleted, _) = tokio::join!(
            delete_request(&state, &admin, request_id),
            set_status(&state, &creator, request_id, JoinRequestStatus::Accepted),
        );

        deleted.unwrap();
        assert!(store.find_join_request(request_id).await.unwrap().is_none());
        assert!(store.find_participant(tid, player.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_withdrawal_and_accept_stay_consistent() {
        let store = MemoryStore::with_latency(Duration::from_millis(20));
        let state = testing::state_with(store.clone()).await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;

        let (withdrawn, accepted) = tokio::join!(
            cancel_mine(&state, &player, request_id),
            set_status(&state, &creator, request_id, JoinRequestStatus::Accepted),
        );

        assert!(withdrawn.is_ok() != accepted.is_ok());
        let request = store.find_join_request(request_id).await.unwrap();
        let participant = store.find_participant(tid, player.id).await.unwrap();
        assert_eq!(participant.is_some(), request.is_some());
        assert_eq!(participant.is_some(), accepted.is_ok());
    }

    #[tokio::test]
    async fn acceptance_sees_capacity_lowered_while_waiting() {
        let store = MemoryStore::with_latency(Duration::from_millis(20));
        let state = testing::state_with(store.clone()).await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        for name in ["a", "b"] {
            let (_, request_id) = pending(&state, tid, name).await;
            set_status(&state, &creator, request_id, JoinRequestStatus::Accepted)
                .await
                .unwrap();
        }
        let (_, late) = pending(&state, tid, "late").await;

        let _ = tokio::join!(
            tournament_service::update(
                &state,
                &creator,
                tid,
                UpdateTournamentRequest {
                    max_participants: Some(2),
                    ..Default::default()
                },
            ),
            set_status(&state, &creator, late, JoinRequestStatus::Accepted),
        );

        let tournament = store.find_tournament(tid).await.unwrap().unwrap();
        let admitted = store.count_participants(tid).await.unwrap();
        assert!(admitted <= u64::from(tournament.max_participants));
    }

    #[tokio::test]
    async fn closed_tournaments_refuse_requests() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let player = testing::user(&state, "player", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        tournament_service::set_status(&state, &creator, tid, TournamentStatus::Completed)
            .await
            .unwrap();

        assert!(matches!(
            request_join(&state, &player, tid).await,
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn only_pending_requests_can_be_withdrawn_by_their_owner() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        let (player, request_id) = pending(&state, tid, "player").await;
        let (_, accepted_id) = pending(&state, tid, "other").await;
        set_status(&state, &creator, accepted_id, JoinRequestStatus::Accepted)
            .await
            .unwrap();

        assert!(matches!(
            cancel_mine(&state, &creator, request_id).await,
            Err(ServiceError::NotFound(_))
        ));
        cancel_mine(&state, &player, request_id).await.unwrap();
        assert!(list_mine(&state, &player).await.unwrap().is_empty());

        assert_eq!(
            list_all(&state, Some(JoinRequestStatus::Accepted))
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
