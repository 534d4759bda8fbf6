//! BSON document shapes. Identifiers are stored as hyphenated strings.

use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::dao::models::{
    ContactEntity, ContactStatus, GameEntity, JoinRequestEntity, JoinRequestStatus, MessageEntity,
    NotificationEntity, NotificationKind, ParticipantEntity, Role, TeamEntity, TeamMemberEntity,
    TeamRole, TournamentEntity, TournamentStatus, TournamentStatusEntity, TournamentTypeEntity,
    UserEntity,
};

pub const USERS: &str = "users";
pub const GAMES: &str = "games";
pub const TOURNAMENT_TYPES: &str = "tournament_types";
pub const TOURNAMENTS: &str = "tournaments";
pub const TOURNAMENT_STATUSES: &str = "tournament_statuses";
pub const JOIN_REQUESTS: &str = "join_requests";
pub const PARTICIPANTS: &str = "participants";
pub const TEAMS: &str = "teams";
pub const TEAM_MEMBERS: &str = "team_members";
pub const NOTIFICATIONS: &str = "notifications";
pub const CONTACTS: &str = "contacts";
pub const MESSAGES: &str = "messages";

pub fn doc_id(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

fn parse_id(collection: &'static str, field: &'static str, value: String) -> MongoResult<Uuid> {
    Uuid::parse_str(&value).map_err(|source| MongoDaoError::CorruptDocument {
        collection,
        field,
        value,
        source,
    })
}

fn parse_optional_id(
    collection: &'static str,
    field: &'static str,
    value: Option<String>,
) -> MongoResult<Option<Uuid>> {
    value.map(|v| parse_id(collection, field, v)).transpose()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    email: String,
    password_hash: String,
    role: Role,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<UserEntity> for UserDocument {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id.to_string(),
            username: value.username,
            email: value.email,
            password_hash: value.password_hash,
            role: value.role,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<UserDocument> for UserEntity {
    type Error = MongoDaoError;

    fn try_from(value: UserDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(USERS, "_id", value.id)?,
            username: value.username,
            email: value.email,
            password_hash: value.password_hash,
            role: value.role,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<GameEntity> for GameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            image_url: value.image_url,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<GameDocument> for GameEntity {
    type Error = MongoDaoError;

    fn try_from(value: GameDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(GAMES, "_id", value.id)?,
            name: value.name,
            description: value.description,
            image_url: value.image_url,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentTypeDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    description: Option<String>,
}

impl From<TournamentTypeEntity> for TournamentTypeDocument {
    fn from(value: TournamentTypeEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
        }
    }
}

impl TryFrom<TournamentTypeDocument> for TournamentTypeEntity {
    type Error = MongoDaoError;

    fn try_from(value: TournamentTypeDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(TOURNAMENT_TYPES, "_id", value.id)?,
            name: value.name,
            description: value.description,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    description: Option<String>,
    game_id: String,
    tournament_type_id: Option<String>,
    creator_id: String,
    max_participants: u32,
    min_teams: u32,
    players_per_team: u32,
    starts_at: Option<DateTime>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<TournamentEntity> for TournamentDocument {
    fn from(value: TournamentEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            game_id: value.game_id.to_string(),
            tournament_type_id: value.tournament_type_id.map(|id| id.to_string()),
            creator_id: value.creator_id.to_string(),
            max_participants: value.max_participants,
            min_teams: value.min_teams,
            players_per_team: value.players_per_team,
            starts_at: value.starts_at.map(DateTime::from_system_time),
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<TournamentDocument> for TournamentEntity {
    type Error = MongoDaoError;

    fn try_from(value: TournamentDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(TOURNAMENTS, "_id", value.id)?,
            name: value.name,
            description: value.description,
            game_id: parse_id(TOURNAMENTS, "game_id", value.game_id)?,
            tournament_type_id: parse_optional_id(
                TOURNAMENTS,
                "tournament_type_id",
                value.tournament_type_id,
            )?,
            creator_id: parse_id(TOURNAMENTS, "creator_id", value.creator_id)?,
            max_participants: value.max_participants,
            min_teams: value.min_teams,
            players_per_team: value.players_per_team,
            starts_at: value.starts_at.map(|at| at.to_system_time()),
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentStatusDocument {
    #[serde(rename = "_id")]
    id: String,
    tournament_id: String,
    status: TournamentStatus,
    created_at: DateTime,
}

impl From<TournamentStatusEntity> for TournamentStatusDocument {
    fn from(value: TournamentStatusEntity) -> Self {
        Self {
            id: value.id.to_string(),
            tournament_id: value.tournament_id.to_string(),
            status: value.status,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<TournamentStatusDocument> for TournamentStatusEntity {
    type Error = MongoDaoError;

    fn try_from(value: TournamentStatusDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(TOURNAMENT_STATUSES, "_id", value.id)?,
            tournament_id: parse_id(TOURNAMENT_STATUSES, "tournament_id", value.tournament_id)?,
            status: value.status,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequestDocument {
    #[serde(rename = "_id")]
    id: String,
    tournament_id: String,
    user_id: String,
    status: JoinRequestStatus,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<JoinRequestEntity> for JoinRequestDocument {
    fn from(value: JoinRequestEntity) -> Self {
        Self {
            id: value.id.to_string(),
            tournament_id: value.tournament_id.to_string(),
            user_id: value.user_id.to_string(),
            status: value.status,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<JoinRequestDocument> for JoinRequestEntity {
    type Error = MongoDaoError;

    fn try_from(value: JoinRequestDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(JOIN_REQUESTS, "_id", value.id)?,
            tournament_id: parse_id(JOIN_REQUESTS, "tournament_id", value.tournament_id)?,
            user_id: parse_id(JOIN_REQUESTS, "user_id", value.user_id)?,
            status: value.status,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDocument {
    #[serde(rename = "_id")]
    id: String,
    tournament_id: String,
    user_id: String,
    created_at: DateTime,
}

impl From<ParticipantEntity> for ParticipantDocument {
    fn from(value: ParticipantEntity) -> Self {
        Self {
            id: value.id.to_string(),
            tournament_id: value.tournament_id.to_string(),
            user_id: value.user_id.to_string(),
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<ParticipantDocument> for ParticipantEntity {
    type Error = MongoDaoError;

    fn try_from(value: ParticipantDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(PARTICIPANTS, "_id", value.id)?,
            tournament_id: parse_id(PARTICIPANTS, "tournament_id", value.tournament_id)?,
            user_id: parse_id(PARTICIPANTS, "user_id", value.user_id)?,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDocument {
    #[serde(rename = "_id")]
    id: String,
    tournament_id: String,
    name: String,
    captain_id: String,
    created_at: DateTime,
}

impl From<TeamEntity> for TeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id.to_string(),
            tournament_id: value.tournament_id.to_string(),
            name: value.name,
            captain_id: value.captain_id.to_string(),
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<TeamDocument> for TeamEntity {
    type Error = MongoDaoError;

    fn try_from(value: TeamDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(TEAMS, "_id", value.id)?,
            tournament_id: parse_id(TEAMS, "tournament_id", value.tournament_id)?,
            name: value.name,
            captain_id: parse_id(TEAMS, "captain_id", value.captain_id)?,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberDocument {
    #[serde(rename = "_id")]
    id: String,
    team_id: String,
    user_id: String,
    role: TeamRole,
    created_at: DateTime,
}

impl From<TeamMemberEntity> for TeamMemberDocument {
    fn from(value: TeamMemberEntity) -> Self {
        Self {
            id: value.id.to_string(),
            team_id: value.team_id.to_string(),
            user_id: value.user_id.to_string(),
            role: value.role,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<TeamMemberDocument> for TeamMemberEntity {
    type Error = MongoDaoError;

    fn try_from(value: TeamMemberDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(TEAM_MEMBERS, "_id", value.id)?,
            team_id: parse_id(TEAM_MEMBERS, "team_id", value.team_id)?,
            user_id: parse_id(TEAM_MEMBERS, "user_id", value.user_id)?,
            role: value.role,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDocument {
    #[serde(rename = "_id")]
    id: String,
    user_id: String,
    kind: NotificationKind,
    title: String,
    message: String,
    #[serde(default)]
    data: serde_json::Value,
    is_read: bool,
    created_at: DateTime,
}

impl From<NotificationEntity> for NotificationDocument {
    fn from(value: NotificationEntity) -> Self {
        Self {
            id: value.id.to_string(),
            user_id: value.user_id.to_string(),
            kind: value.kind,
            title: value.title,
            message: value.message,
            data: value.data,
            is_read: value.is_read,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<NotificationDocument> for NotificationEntity {
    type Error = MongoDaoError;

    fn try_from(value: NotificationDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(NOTIFICATIONS, "_id", value.id)?,
            user_id: parse_id(NOTIFICATIONS, "user_id", value.user_id)?,
            kind: value.kind,
            title: value.title,
            message: value.message,
            data: value.data,
            is_read: value.is_read,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: String,
    subject: String,
    message: String,
    status: ContactStatus,
    created_at: DateTime,
}

impl From<ContactEntity> for ContactDocument {
    fn from(value: ContactEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
            status: value.status,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<ContactDocument> for ContactEntity {
    type Error = MongoDaoError;

    fn try_from(value: ContactDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(CONTACTS, "_id", value.id)?,
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
            status: value.status,
            created_at: value.created_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDocument {
    #[serde(rename = "_id")]
    id: String,
    sender_id: String,
    recipient_id: String,
    subject: String,
    content: String,
    is_read: bool,
    created_at: DateTime,
}

impl From<MessageEntity> for MessageDocument {
    fn from(value: MessageEntity) -> Self {
        Self {
            id: value.id.to_string(),
            sender_id: value.sender_id.to_string(),
            recipient_id: value.recipient_id.to_string(),
            subject: value.subject,
            content: value.content,
            is_read: value.is_read,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl TryFrom<MessageDocument> for MessageEntity {
    type Error = MongoDaoError;

    fn try_from(value: MessageDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(MESSAGES, "_id", value.id)?,
            sender_id: parse_id(MESSAGES, "sender_id", value.sender_id)?,
            recipient_id: parse_id(MESSAGES, "recipient_id", value.recipient_id)?,
            subject: value.subject,
            content: value.content,
            is_read: value.is_read,
            created_at: value.created_at.to_system_time(),
        })
    }
}
