pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{
    ContactEntity, ContactStatus, GameEntity, JoinRequestEntity, JoinRequestFilter,
    JoinRequestStatus, MessageEntity, MessageFilter, NotificationEntity, ParticipantEntity,
    StatsEntity, TeamEntity, TeamMemberEntity, TeamRole, TournamentEntity, TournamentStatusEntity,
    TournamentTypeEntity, UserEntity,
};
use crate::dao::storage::StorageResult;

pub use self::memory::MemoryStore;

/// Optional criteria narrowing a tournament listing. Empty means everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TournamentFilter {
    pub game_id: Option<Uuid>,
    pub creator_id: Option<Uuid>,
    pub tournament_type_id: Option<Uuid>,
}

impl TournamentFilter {
    pub fn matches(&self, tournament: &TournamentEntity) -> bool {
        self.game_id.is_none_or(|id| tournament.game_id == id)
            && self.creator_id.is_none_or(|id| tournament.creator_id == id)
            && self
                .tournament_type_id
                .is_none_or(|id| tournament.tournament_type_id == Some(id))
    }
}

/// Abstraction over the persistence layer for every arena aggregate.
///
/// Methods returning `bool` report whether a row matched. Cascading deletes
/// (`delete_user`, `delete_tournament`, `delete_team`) and the paired inserts
/// (`insert_tournament`, `insert_team`) are atomic.
pub trait ArenaStore: Send + Sync {
    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>>;
    fn count_users(&self) -> BoxFuture<'static, StorageResult<u64>>;
    fn update_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove a user with their join requests, participations, team memberships,
    /// notifications and messages.
    fn delete_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn insert_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    fn update_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<bool>>;
    fn delete_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn insert_tournament_type(
        &self,
        kind: TournamentTypeEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn find_tournament_type(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TournamentTypeEntity>>>;
    fn list_tournament_types(&self) -> BoxFuture<'static, StorageResult<Vec<TournamentTypeEntity>>>;
    fn delete_tournament_type(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    /// Persist a tournament together with its first status row.
    fn insert_tournament(
        &self,
        tournament: TournamentEntity,
        initial_status: TournamentStatusEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn find_tournament(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TournamentEntity>>>;
    fn list_tournaments(
        &self,
        filter: TournamentFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<TournamentEntity>>>;
    fn update_tournament(
        &self,
        tournament: TournamentEntity,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove a tournament with its status history, join requests, participants,
    /// teams and team members.
    fn delete_tournament(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    fn insert_tournament_status(
        &self,
        status: TournamentStatusEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Status history, oldest first.
    fn list_tournament_statuses(
        &self,
        tournament_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<TournamentStatusEntity>>>;

    fn insert_join_request(
        &self,
        request: JoinRequestEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn find_join_request(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<JoinRequestEntity>>>;
    fn find_join_request_for(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<JoinRequestEntity>>>;
    /// Matching requests, oldest first.
    fn list_join_requests(
        &self,
        filter: JoinRequestFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<JoinRequestEntity>>>;
    fn update_join_request_status(
        &self,
        id: Uuid,
        status: JoinRequestStatus,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    fn delete_join_request(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn insert_participant(
        &self,
        participant: ParticipantEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn find_participant(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<ParticipantEntity>>>;
    fn list_participants(
        &self,
        tournament_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<ParticipantEntity>>>;
    fn count_participants(&self, tournament_id: Uuid) -> BoxFuture<'static, StorageResult<u64>>;
    /// Remove a participant together with their team rows in that tournament.
    /// Teams they captain are deleted with all of their members.
    fn delete_participant(
        &self,
        tournament_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    /// Persist a team together with its captain membership.
    fn insert_team(
        &self,
        team: TeamEntity,
        captain: TeamMemberEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Teams of one tournament, or every team when `tournament_id` is `None`.
    fn list_teams(
        &self,
        tournament_id: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    fn rename_team(&self, id: Uuid, name: String) -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove a team with all of its memberships.
    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    fn insert_team_member(
        &self,
        member: TeamMemberEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn find_team_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamMemberEntity>>>;
    fn list_team_members(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamMemberEntity>>>;
    fn list_user_memberships(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<TeamMemberEntity>>>;
    fn update_team_member_role(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    fn delete_team_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    fn insert_notifications(
        &self,
        notifications: Vec<NotificationEntity>,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Newest first, at most `limit` rows.
    fn list_notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<NotificationEntity>>>;
    fn count_unread_notifications(&self, user_id: Uuid)
    -> BoxFuture<'static, StorageResult<u64>>;
    fn mark_notification_read(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    fn mark_all_notifications_read(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<u64>>;
    fn delete_notification(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    fn insert_contact(&self, contact: ContactEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Newest first.
    fn list_contacts(&self) -> BoxFuture<'static, StorageResult<Vec<ContactEntity>>>;
    fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    fn delete_contact(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn insert_message(&self, message: MessageEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_message(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MessageEntity>>>;
    /// Newest first.
    fn list_messages(
        &self,
        filter: MessageFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<MessageEntity>>>;
    fn mark_message_read(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    fn delete_message(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn stats(&self) -> BoxFuture<'static, StorageResult<StatsEntity>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
