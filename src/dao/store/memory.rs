//! Process-local storage backend. Used when no database is configured and by the
//! test-suite.

use std::{cmp::Reverse, sync::Arc, time::Duration};

use futures::future::BoxFuture;
use tokio::{sync::RwLock, time::sleep};
use uuid::Uuid;

use super::{ArenaStore, TournamentFilter};
use crate::dao::{
    models::{
        ContactEntity, ContactStatus, GameEntity, JoinRequestEntity, JoinRequestFilter,
        JoinRequestStatus, MessageEntity, MessageFilter, NotificationEntity, ParticipantEntity,
        StatsEntity, TeamEntity, TeamMemberEntity, TeamRole, TournamentEntity,
        TournamentStatusEntity, TournamentTypeEntity, UserEntity,
    },
    storage::{StorageError, StorageResult},
};

#[derive(Default)]
struct Tables {
    users: Vec<UserEntity>,
    games: Vec<GameEntity>,
    tournament_types: Vec<TournamentTypeEntity>,
    tournaments: Vec<TournamentEntity>,
    tournament_statuses: Vec<TournamentStatusEntity>,
    join_requests: Vec<JoinRequestEntity>,
    participants: Vec<ParticipantEntity>,
    teams: Vec<TeamEntity>,
    team_members: Vec<TeamMemberEntity>,
    notifications: Vec<NotificationEntity>,
    contacts: Vec<ContactEntity>,
    messages: Vec<MessageEntity>,
}

/// In-memory [`ArenaStore`]; every operation runs under one table lock so the
/// cascades are trivially atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    tables: RwLock<Tables>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation by `latency`, simulating a remote backend so request
    /// interleavings show up under concurrency.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                tables: RwLock::new(Tables::default()),
                latency: Some(latency),
            }),
        }
    }

    fn read<T, F>(&self, f: F) -> BoxFuture<'static, StorageResult<T>>
    where
        F: FnOnce(&Tables) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.pause().await;
            let tables = inner.tables.read().await;
            f(&tables)
        })
    }

    fn write<T, F>(&self, f: F) -> BoxFuture<'static, StorageResult<T>>
    where
        F: FnOnce(&mut Tables) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.pause().await;
            let mut tables = inner.tables.write().await;
            f(&mut tables)
        })
    }
}

impl MemoryInner {
    async fn pause(&self) {
        if let Some(latency) = self.latency {
            sleep(latency).await;
        }
    }
}

/// Remove every element matching `predicate`, returning how many went away.
fn remove_where<T>(rows: &mut Vec<T>, predicate: impl Fn(&T) -> bool) -> u64 {
    let before = rows.len();
    rows.retain(|row| !predicate(row));
    (before - rows.len()) as u64
}

fn newest_first<T: Clone>(
    rows: impl DoubleEndedIterator<Item = T>,
    key: impl Fn(&T) -> std::time::SystemTime,
) -> Vec<T> {
    // Reverse first so that equal timestamps keep the latest insert in front.
    let mut rows: Vec<T> = rows.rev().collect();
    rows.sort_by_key(|row| Reverse(key(row)));
    rows
}

impl ArenaStore for MemoryStore {
    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            if t.users.iter().any(|u| u.email == user.email) {
                return Err(StorageError::conflict("user email"));
            }
            t.users.push(user);
            Ok(())
        })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        self.read(move |t| Ok(t.users.iter().find(|u| u.id == id).cloned()))
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        self.read(move |t| Ok(t.users.iter().find(|u| u.email == email).cloned()))
    }

    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        self.read(|t| Ok(t.users.clone()))
    }

    fn count_users(&self) -> BoxFuture<'static, StorageResult<u64>> {
        self.read(|t| Ok(t.users.len() as u64))
    }

    fn update_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            if t
                .users
                .iter()
                .any(|u| u.id != user.id && u.email == user.email)
            {
                return Err(StorageError::conflict("user email"));
            }
            match t.users.iter_mut().find(|u| u.id == user.id) {
                Some(slot) => {
                    *slot = user;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn delete_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            if remove_where(&mut t.users, |u| u.id == id) == 0 {
                return Ok(false);
            }
            remove_where(&mut t.join_requests, |r| r.user_id == id);
            remove_where(&mut t.participants, |p| p.user_id == id);
            remove_where(&mut t.team_members, |m| m.user_id == id);
            remove_where(&mut t.notifications, |n| n.user_id == id);
            remove_where(&mut t.messages, |m| m.sender_id == id || m.recipient_id == id);
            Ok(true)
        })
    }

    fn insert_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            if t.games.iter().any(|g| g.name == game.name) {
                return Err(StorageError::conflict("game name"));
            }
            t.games.push(game);
            Ok(())
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        self.read(move |t| Ok(t.games.iter().find(|g| g.id == id).cloned()))
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        self.read(|t| {
            let mut games = t.games.clone();
            games.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(games)
        })
    }

    fn update_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            if t.games.iter().any(|g| g.id != game.id && g.name == game.name) {
                return Err(StorageError::conflict("game name"));
            }
            match t.games.iter_mut().find(|g| g.id == game.id) {
                Some(slot) => {
                    *slot = game;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| Ok(remove_where(&mut t.games, |g| g.id == id) > 0))
    }

    fn insert_tournament_type(
        &self,
        kind: TournamentTypeEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            if t.tournament_types.iter().any(|k| k.name == kind.name) {
                return Err(StorageError::conflict("tournament type name"));
            }
            t.tournament_types.push(kind);
            Ok(())
        })
    }

    fn find_tournament_type(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TournamentTypeEntity>>> {
        self.read(move |t| Ok(t.tournament_types.iter().find(|k| k.id == id).cloned()))
    }

    fn list_tournament_types(&self) -> BoxFuture<'static, StorageResult<Vec<TournamentTypeEntity>>> {
        self.read(|t| {
            let mut kinds = t.tournament_types.clone();
            kinds.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(kinds)
        })
    }

    fn delete_tournament_type(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| Ok(remove_where(&mut t.tournament_types, |k| k.id == id) > 0))
    }

    fn insert_tournament(
        &self,
        tournament: TournamentEntity,
        initial_status: TournamentStatusEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            t.tournaments.push(tournament);
            t.tournament_statuses.push(initial_status);
            Ok(())
        })
    }

    fn find_tournament(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TournamentEntity>>> {
        self.read(move |t| Ok(t.tournaments.iter().find(|x| x.id == id).cloned()))
    }

    fn list_tournaments(
        &self,
        filter: TournamentFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<TournamentEntity>>> {
        self.read(move |t| {
            Ok(newest_first(
                t.tournaments.iter().filter(|x| filter.matches(x)).cloned(),
                |x| x.created_at,
            ))
        })
    }

    fn update_tournament(
        &self,
        tournament: TournamentEntity,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| match t.tournaments.iter_mut().find(|x| x.id == tournament.id) {
            Some(slot) => {
                *slot = tournament;
                Ok(true)
            }
            None => Ok(false),
        })
    }

    fn delete_tournament(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            if remove_where(&mut t.tournaments, |x| x.id == id) == 0 {
                return Ok(false);
            }
            let team_ids: Vec<Uuid> = t
                .teams
                .iter()
                .filter(|team| team.tournament_id == id)
                .map(|team| team.id)
                .collect();
            remove_where(&mut t.team_members, |m| team_ids.contains(&m.team_id));
            remove_where(&mut t.teams, |team| team.tournament_id == id);
            remove_where(&mut t.participants, |p| p.tournament_id == id);
            remove_where(&mut t.join_requests, |r| r.tournament_id == id);
            remove_where(&mut t.tournament_statuses, |s| s.tournament_id == id);
            Ok(true)
        })
    }

    fn insert_tournament_status(
        &self,
        status: TournamentStatusEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            t.tournament_statuses.push(status);
            Ok(())
        })
    }

    fn list_tournament_statuses(
        &self,
        tournament_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<TournamentStatusEntity>>> {
        self.read(move |t| {
            let mut history: Vec<_> = t
                .tournament_statuses
                .iter()
                .filter(|s| s.tournament_id == tournament_id)
                .cloned()
                .collect();
            history.sort_by_key(|s| s.created_at);
            Ok(history)
        })
    }

    fn insert_join_request(
        &self,
        request: JoinRequestEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            if t
                .join_requests
                .iter()
                .any(|r| r.tournament_id == request.tournament_id && r.user_id == request.user_id)
            {
                return Err(StorageError::conflict("join request"));
            }
            t.join_requests.push(request);
            Ok(())
        })
    }

    fn find_join_request(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<JoinRequestEntity>>> {
        self.read(move |t| Ok(t.join_requests.iter().find(|r| r.id == id).cloned()))
    }

    fn find_join_request_for(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<JoinRequestEntity>>> {
        self.read(move |t| {
            Ok(t
                .join_requests
                .iter()
                .find(|r| r.tournament_id == tournament_id && r.user_id == user_id)
                .cloned())
        })
    }

    fn list_join_requests(
        &self,
        filter: JoinRequestFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<JoinRequestEntity>>> {
        self.read(move |t| {
            Ok(t
                .join_requests
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect())
        })
    }

    fn update_join_request_status(
        &self,
        id: Uuid,
        status: JoinRequestStatus,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| match t.join_requests.iter_mut().find(|r| r.id == id) {
            Some(request) => {
                request.status = status;
                request.updated_at = std::time::SystemTime::now();
                Ok(true)
            }
            None => Ok(false),
        })
    }

    fn delete_join_request(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| Ok(remove_where(&mut t.join_requests, |r| r.id == id) > 0))
    }

    fn insert_participant(
        &self,
        participant: ParticipantEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            if t.participants.iter().any(|p| {
                p.tournament_id == participant.tournament_id && p.user_id == participant.user_id
            }) {
                return Err(StorageError::conflict("participant"));
            }
            t.participants.push(participant);
            Ok(())
        })
    }

    fn find_participant(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ParticipantEntity>>> {
        self.read(move |t| {
            Ok(t
                .participants
                .iter()
                .find(|p| p.tournament_id == tournament_id && p.user_id == user_id)
                .cloned())
        })
    }

    fn list_participants(
        &self,
        tournament_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<ParticipantEntity>>> {
        self.read(move |t| {
            Ok(t
                .participants
                .iter()
                .filter(|p| p.tournament_id == tournament_id)
                .cloned()
                .collect())
        })
    }

    fn count_participants(&self, tournament_id: Uuid) -> BoxFuture<'static, StorageResult<u64>> {
        self.read(move |t| {
            Ok(t
                .participants
                .iter()
                .filter(|p| p.tournament_id == tournament_id)
                .count() as u64)
        })
    }

    fn delete_participant(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            if remove_where(&mut t.participants, |p| {
                p.tournament_id == tournament_id && p.user_id == user_id
            }) == 0
            {
                return Ok(false);
            }

            let captained: Vec<Uuid> = t
                .teams
                .iter()
                .filter(|x| x.tournament_id == tournament_id && x.captain_id == user_id)
                .map(|x| x.id)
                .collect();
            remove_where(&mut t.teams, |x| captained.contains(&x.id));

            let tournament_teams: Vec<Uuid> = t
                .teams
                .iter()
                .filter(|x| x.tournament_id == tournament_id)
                .map(|x| x.id)
                .collect();
            remove_where(&mut t.team_members, |m| {
                captained.contains(&m.team_id)
                    || (m.user_id == user_id && tournament_teams.contains(&m.team_id))
            });
            Ok(true)
        })
    }

    fn insert_team(
        &self,
        team: TeamEntity,
        captain: TeamMemberEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            if t
                .teams
                .iter()
                .any(|x| x.tournament_id == team.tournament_id && x.name == team.name)
            {
                return Err(StorageError::conflict("team name"));
            }
            t.teams.push(team);
            t.team_members.push(captain);
            Ok(())
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        self.read(move |t| Ok(t.teams.iter().find(|x| x.id == id).cloned()))
    }

    fn list_teams(
        &self,
        tournament_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        self.read(move |t| {
            Ok(t
                .teams
                .iter()
                .filter(|x| tournament_id.is_none_or(|id| x.tournament_id == id))
                .cloned()
                .collect())
        })
    }

    fn rename_team(&self, id: Uuid, name: String) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            let Some(tournament_id) = t.teams.iter().find(|x| x.id == id).map(|x| x.tournament_id)
            else {
                return Ok(false);
            };
            if t
                .teams
                .iter()
                .any(|x| x.id != id && x.tournament_id == tournament_id && x.name == name)
            {
                return Err(StorageError::conflict("team name"));
            }
            if let Some(team) = t.teams.iter_mut().find(|x| x.id == id) {
                team.name = name;
            }
            Ok(true)
        })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            if remove_where(&mut t.teams, |x| x.id == id) == 0 {
                return Ok(false);
            }
            remove_where(&mut t.team_members, |m| m.team_id == id);
            Ok(true)
        })
    }

    fn insert_team_member(
        &self,
        member: TeamMemberEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            if t
                .team_members
                .iter()
                .any(|m| m.team_id == member.team_id && m.user_id == member.user_id)
            {
                return Err(StorageError::conflict("team member"));
            }
            t.team_members.push(member);
            Ok(())
        })
    }

    fn find_team_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamMemberEntity>>> {
        self.read(move |t| {
            Ok(t
                .team_members
                .iter()
                .find(|m| m.team_id == team_id && m.user_id == user_id)
                .cloned())
        })
    }

    fn list_team_members(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamMemberEntity>>> {
        self.read(move |t| {
            Ok(t
                .team_members
                .iter()
                .filter(|m| m.team_id == team_id)
                .cloned()
                .collect())
        })
    }

    fn list_user_memberships(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamMemberEntity>>> {
        self.read(move |t| {
            Ok(t
                .team_members
                .iter()
                .filter(|m| m.user_id == user_id)
                .cloned()
                .collect())
        })
    }

    fn update_team_member_role(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            match t
                .team_members
                .iter_mut()
                .find(|m| m.team_id == team_id && m.user_id == user_id)
            {
                Some(member) => {
                    member.role = role;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn delete_team_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            Ok(remove_where(&mut t.team_members, |m| {
                m.team_id == team_id && m.user_id == user_id
            }) > 0)
        })
    }

    fn insert_notifications(
        &self,
        notifications: Vec<NotificationEntity>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            t.notifications.extend(notifications);
            Ok(())
        })
    }

    fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<NotificationEntity>>> {
        self.read(move |t| {
            let mut rows = newest_first(
                t.notifications
                    .iter()
                    .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
                    .cloned(),
                |n| n.created_at,
            );
            rows.truncate(limit);
            Ok(rows)
        })
    }

    fn count_unread_notifications(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        self.read(move |t| {
            Ok(t
                .notifications
                .iter()
                .filter(|n| n.user_id == user_id && !n.is_read)
                .count() as u64)
        })
    }

    fn mark_notification_read(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            match t
                .notifications
                .iter_mut()
                .find(|n| n.id == id && n.user_id == user_id)
            {
                Some(notification) => {
                    notification.is_read = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn mark_all_notifications_read(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        self.write(move |t| {
            let mut updated = 0;
            for notification in t
                .notifications
                .iter_mut()
                .filter(|n| n.user_id == user_id && !n.is_read)
            {
                notification.is_read = true;
                updated += 1;
            }
            Ok(updated)
        })
    }

    fn delete_notification(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| {
            Ok(remove_where(&mut t.notifications, |n| n.id == id && n.user_id == user_id) > 0)
        })
    }

    fn insert_contact(&self, contact: ContactEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            t.contacts.push(contact);
            Ok(())
        })
    }

    fn list_contacts(&self) -> BoxFuture<'static, StorageResult<Vec<ContactEntity>>> {
        self.read(|t| Ok(newest_first(t.contacts.iter().cloned(), |c| c.created_at)))
    }

    fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| match t.contacts.iter_mut().find(|c| c.id == id) {
            Some(contact) => {
                contact.status = status;
                Ok(true)
            }
            None => Ok(false),
        })
    }

    fn delete_contact(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| Ok(remove_where(&mut t.contacts, |c| c.id == id) > 0))
    }

    fn insert_message(&self, message: MessageEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write(move |t| {
            t.messages.push(message);
            Ok(())
        })
    }

    fn find_message(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MessageEntity>>> {
        self.read(move |t| Ok(t.messages.iter().find(|m| m.id == id).cloned()))
    }

    fn list_messages(
        &self,
        filter: MessageFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<MessageEntity>>> {
        self.read(move |t| {
            Ok(newest_first(
                t.messages.iter().filter(|m| filter.matches(m)).cloned(),
                |m| m.created_at,
            ))
        })
    }

    fn mark_message_read(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| match t.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        })
    }

    fn delete_message(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.write(move |t| Ok(remove_where(&mut t.messages, |m| m.id == id) > 0))
    }

    fn stats(&self) -> BoxFuture<'static, StorageResult<StatsEntity>> {
        self.read(|t| {
            Ok(StatsEntity {
                users: t.users.len() as u64,
                games: t.games.len() as u64,
                tournaments: t.tournaments.len() as u64,
                teams: t.teams.len() as u64,
                pending_join_requests: t
                    .join_requests
                    .iter()
                    .filter(|r| r.status == JoinRequestStatus::Pending)
                    .count() as u64,
                new_contacts: t
                    .contacts
                    .iter()
                    .filter(|c| c.status == ContactStatus::New)
                    .count() as u64,
            })
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::dao::models::NotificationKind;

    fn notification(user_id: Uuid, title: &str, created_at: SystemTime) -> NotificationEntity {
        NotificationEntity {
            id: Uuid::new_v4(),
            user_id,
            kind: NotificationKind::System,
            title: title.into(),
            message: String::new(),
            data: serde_json::Value::Null,
            is_read: false,
            created_at,
        }
    }

    #[tokio::test]
    async fn notifications_are_listed_newest_first() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        store
            .insert_notifications(vec![
                notification(user, "old", t0),
                notification(user, "new", t0 + Duration::from_secs(5)),
                notification(user, "same-time-later-insert", t0 + Duration::from_secs(5)),
                notification(Uuid::new_v4(), "someone else", t0),
            ])
            .await
            .unwrap();

        let titles: Vec<_> = store
            .list_notifications(user, false, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["same-time-later-insert", "new", "old"]);

        let limited = store.list_notifications(user, false, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_participant_is_a_conflict() {
        let store = MemoryStore::new();
        let participant = ParticipantEntity {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: SystemTime::now(),
        };
        store.insert_participant(participant.clone()).await.unwrap();

        let err = store
            .insert_participant(ParticipantEntity {
                id: Uuid::new_v4(),
                ..participant
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict { .. }));
    }

    #[tokio::test]
    async fn deleting_a_team_drops_its_members() {
        let store = MemoryStore::new();
        let team = TeamEntity {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            name: "Red".into(),
            captain_id: Uuid::new_v4(),
            created_at: SystemTime::now(),
        };
        let captain = TeamMemberEntity {
            id: Uuid::new_v4(),
            team_id: team.id,
            user_id: team.captain_id,
            role: TeamRole::Captain,
            created_at: SystemTime::now(),
        };
        store.insert_team(team.clone(), captain).await.unwrap();

        assert!(store.delete_team(team.id).await.unwrap());
        assert!(store.list_team_members(team.id).await.unwrap().is_empty());
        assert!(!store.delete_team(team.id).await.unwrap());
    }
    #[tokio::test]
    async fn removing_a_participant_clears_their_team_rows() {
        let store = MemoryStore::new();
        let tournament_id = Uuid::new_v4();
        let (captain_id, player_id) = (Uuid::new_v4(), Uuid::new_v4());
        for user_id in [captain_id, player_id] {
            store
                .insert_participant(ParticipantEntity {
                    id: Uuid::new_v4(),
                    tournament_id,
                    user_id,
                    created_at: SystemTime::now(),
                })
                .await
                .unwrap();
        }

        let team = |name: &str, captain_id: Uuid| TeamEntity {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
            captain_id,
            created_at: SystemTime::now(),
        };
        let member = |team_id: Uuid, user_id: Uuid, role: TeamRole| TeamMemberEntity {
            id: Uuid::new_v4(),
            team_id,
            user_id,
            role,
            created_at: SystemTime::now(),
        };
        let red = team("Red", captain_id);
        let blue = team("Blue", player_id);
        store
            .insert_team(red.clone(), member(red.id, captain_id, TeamRole::Captain))
            .await
            .unwrap();
        store
            .insert_team(blue.clone(), member(blue.id, player_id, TeamRole::Captain))
            .await
            .unwrap();
        store
            .insert_team_member(member(red.id, player_id, TeamRole::Pending))
            .await
            .unwrap();

        assert!(store.delete_participant(tournament_id, player_id).await.unwrap());

        assert!(store.find_team(blue.id).await.unwrap().is_none());
        assert!(store.list_team_members(blue.id).await.unwrap().is_empty());
        let red_members = store.list_team_members(red.id).await.unwrap();
        assert_eq!(red_members.len(), 1);
        assert_eq!(red_members[0].user_id, captain_id);
        assert!(!store.delete_participant(tournament_id, player_id).await.unwrap());
    }
}
