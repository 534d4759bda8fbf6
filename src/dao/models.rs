use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Access level attached to an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular player account.
    User,
    /// Back-office operator.
    Admin,
}

impl Role {
    /// Stable string form used in tokens and storage filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Registered account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Stable identifier for the user.
    pub id: Uuid,
    /// Public display name.
    pub username: String,
    /// Lowercased login email, unique across accounts.
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

/// Video game a tournament is played on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    pub id: Uuid,
    /// Display name, unique across games.
    pub name: String,
    pub description: Option<String>,
    /// External image reference; uploads are handled elsewhere.
    pub image_url: Option<String>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

/// Bracket format label (single elimination, round robin, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentTypeEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Tournament aggregate root. The current status lives in the status history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub game_id: Uuid,
    pub tournament_type_id: Option<Uuid>,
    /// User who created the tournament and moderates its join requests.
    pub creator_id: Uuid,
    /// Upper bound on accepted participants.
    pub max_participants: u32,
    pub min_teams: u32,
    pub players_per_team: u32,
    pub starts_at: Option<SystemTime>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

/// Lifecycle stage of a tournament.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Upcoming,
    RegistrationOpen,
    RegistrationClosed,
    InProgress,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    /// Whether the tournament still accepts join requests.
    pub fn accepts_requests(self) -> bool {
        !matches!(self, TournamentStatus::Completed | TournamentStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "upcoming",
            TournamentStatus::RegistrationOpen => "registration_open",
            TournamentStatus::RegistrationClosed => "registration_closed",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Completed => "completed",
            TournamentStatus::Cancelled => "cancelled",
        }
    }
}

/// One entry of a tournament's status history; the newest entry is the current status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentStatusEntity {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub status: TournamentStatus,
    pub created_at: SystemTime,
}

/// Moderation state of a join request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JoinRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl JoinRequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinRequestStatus::Pending => "pending",
            JoinRequestStatus::Accepted => "accepted",
            JoinRequestStatus::Rejected => "rejected",
        }
    }
}

/// A user's request to take part in a tournament. Unique per (tournament, user).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinRequestEntity {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub user_id: Uuid,
    pub status: JoinRequestStatus,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

/// Membership record mirroring an accepted join request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantEntity {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub user_id: Uuid,
    pub created_at: SystemTime,
}

/// Team formed by participants of one tournament.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    pub id: Uuid,
    pub tournament_id: Uuid,
    /// Unique within the tournament.
    pub name: String,
    pub captain_id: Uuid,
    pub created_at: SystemTime,
}

/// Role held by a user inside a team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Captain,
    Member,
    /// Asked to join, waiting for the captain.
    Pending,
}

impl TeamRole {
    /// Captains and members count against the team size; pending rows do not.
    pub fn is_active(self) -> bool {
        !matches!(self, TeamRole::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TeamRole::Captain => "captain",
            TeamRole::Member => "member",
            TeamRole::Pending => "pending",
        }
    }
}

/// Link between a user and a team. Unique per (user, team).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMemberEntity {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: TeamRole,
    pub created_at: SystemTime,
}

/// Event category carried by a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    JoinRequestReceived,
    JoinRequestAccepted,
    JoinRequestRejected,
    TeamJoinRequested,
    TeamMemberAdded,
    TeamMemberRemoved,
    TournamentStatusChanged,
    MessageReceived,
    System,
}

/// Fire-and-forget notification row. Consumers poll for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Free-form payload (ids of the objects involved, ...).
    pub data: serde_json::Value,
    pub is_read: bool,
    pub created_at: SystemTime,
}

/// Triage state of a contact-form submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    New,
    Read,
    Archived,
}

impl ContactStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Archived => "archived",
        }
    }
}

/// Public contact-form submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: SystemTime,
}

/// Direct message between two users.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageEntity {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub subject: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: SystemTime,
}

/// Row counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsEntity {
    pub users: u64,
    pub games: u64,
    pub tournaments: u64,
    pub teams: u64,
    pub pending_join_requests: u64,
    pub new_contacts: u64,
}

/// Optional criteria narrowing a join request listing. Empty means everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinRequestFilter {
    pub tournament_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<JoinRequestStatus>,
}

impl JoinRequestFilter {
    pub fn matches(&self, request: &JoinRequestEntity) -> bool {
        self.tournament_id.is_none_or(|id| request.tournament_id == id)
            && self.user_id.is_none_or(|id| request.user_id == id)
            && self.status.is_none_or(|status| request.status == status)
    }
}

/// Optional criteria narrowing a message listing. Empty means everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub sender_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
}

impl MessageFilter {
    pub fn matches(&self, message: &MessageEntity) -> bool {
        self.sender_id.is_none_or(|id| message.sender_id == id)
            && self.recipient_id.is_none_or(|id| message.recipient_id == id)
    }
}
