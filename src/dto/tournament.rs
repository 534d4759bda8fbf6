use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{ParticipantEntity, TournamentEntity, TournamentStatus, TournamentStatusEntity},
    dto::{
        format_system_time,
        user::UserSummary,
        validation::{
            validate_not_blank, validate_team_layout, validate_timestamp,
        },
    },
};

fn default_min_teams() -> u32 {
    2
}

fn default_players_per_team() -> u32 {
    1
}

/// Payload used to create a tournament. The caller becomes its creator.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_create_layout"))]
pub struct CreateTournamentRequest {
    #[validate(length(min = 3, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub game_id: Uuid,
    #[serde(default)]
    pub tournament_type_id: Option<Uuid>,
    #[validate(range(min = 2, max = 100_000))]
    pub max_participants: u32,
    #[serde(default = "default_min_teams")]
    #[validate(range(min = 2))]
    pub min_teams: u32,
    #[serde(default = "default_players_per_team")]
    #[validate(range(min = 1))]
    pub players_per_team: u32,
    /// RFC 3339 start time.
    #[serde(default)]
    #[validate(custom(function = "validate_timestamp"))]
    pub starts_at: Option<String>,
}

fn validate_create_layout(request: &CreateTournamentRequest) -> Result<(), ValidationError> {
    validate_team_layout(
        request.max_participants,
        request.min_teams,
        request.players_per_team,
    )
}

/// Partial update of a tournament. Absent fields are left untouched, `null`
/// clears the nullable ones.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTournamentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub game_id: Option<Uuid>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub tournament_type_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub min_teams: Option<u32>,
    #[serde(default)]
    pub players_per_team: Option<u32>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub starts_at: Option<Option<String>>,
}

impl Validate for UpdateTournamentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(ref name) = self.name {
            let length = name.chars().count();
            if !(3..=100).contains(&length) || validate_not_blank(name).is_err() {
                let mut err = ValidationError::new("length");
                err.message = Some("name must be 3 to 100 characters".into());
                errors.add("name", err);
            }
        }

        if let Some(Some(ref description)) = self.description {
            if description.chars().count() > 5000 {
                errors.add("description", ValidationError::new("length"));
            }
        }

        if self.max_participants.is_some_and(|value| value < 2) {
            errors.add("max_participants", ValidationError::new("range"));
        }
        if self.min_teams.is_some_and(|value| value < 2) {
            errors.add("min_teams", ValidationError::new("range"));
        }
        if self.players_per_team.is_some_and(|value| value < 1) {
            errors.add("players_per_team", ValidationError::new("range"));
        }

        if let Some(Some(ref starts_at)) = self.starts_at {
            if let Err(err) = validate_timestamp(starts_at) {
                errors.add("starts_at", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Target status for a tournament.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TournamentStatusRequest {
    pub status: TournamentStatus,
}

/// Filters accepted by the tournament listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TournamentListQuery {
    pub game_id: Option<Uuid>,
    pub status: Option<TournamentStatus>,
}

/// Tournament with its derived current status and roster sizes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TournamentResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub game_id: Uuid,
    pub tournament_type_id: Option<Uuid>,
    pub creator_id: Uuid,
    pub max_participants: u32,
    pub min_teams: u32,
    pub players_per_team: u32,
    pub starts_at: Option<String>,
    pub status: TournamentStatus,
    pub participant_count: u64,
    pub team_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl TournamentResponse {
    pub fn new(
        tournament: TournamentEntity,
        status: TournamentStatus,
        participant_count: u64,
        team_count: u64,
    ) -> Self {
        Self {
            id: tournament.id,
            name: tournament.name,
            description: tournament.description,
            game_id: tournament.game_id,
            tournament_type_id: tournament.tournament_type_id,
            creator_id: tournament.creator_id,
            max_participants: tournament.max_participants,
            min_teams: tournament.min_teams,
            players_per_team: tournament.players_per_team,
            starts_at: tournament.starts_at.map(format_system_time),
            status,
            participant_count,
            team_count,
            created_at: format_system_time(tournament.created_at),
            updated_at: format_system_time(tournament.updated_at),
        }
    }
}

/// One entry of the status history.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryEntry {
    pub status: TournamentStatus,
    pub created_at: String,
}

impl From<TournamentStatusEntity> for StatusHistoryEntry {
    fn from(entry: TournamentStatusEntity) -> Self {
        Self {
            status: entry.status,
            created_at: format_system_time(entry.created_at),
        }
    }
}

/// Accepted participant of a tournament.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantResponse {
    pub user: UserSummary,
    pub joined_at: String,
}

impl ParticipantResponse {
    pub fn new(participant: ParticipantEntity, username: String) -> Self {
        Self {
            user: UserSummary {
                id: participant.user_id,
                username,
            },
            joined_at: format_system_time(participant.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(max: u32, teams: u32, players: u32) -> CreateTournamentRequest {
        CreateTournamentRequest {
            name: "Spring Cup".into(),
            description: None,
            game_id: Uuid::new_v4(),
            tournament_type_id: None,
            max_participants: max,
            min_teams: teams,
            players_per_team: players,
            starts_at: None,
        }
    }

    #[test]
    fn create_requires_room_for_the_minimum_teams() {
        assert!(create(10, 2, 5).validate().is_ok());
        assert!(create(9, 2, 5).validate().is_err());
        assert!(create(1, 2, 1).validate().is_err());
    }

    #[test]
    fn create_defaults_team_layout() {
        let request: CreateTournamentRequest = serde_json::from_value(serde_json::json!({
            "name": "Spring Cup",
            "game_id": Uuid::new_v4(),
            "max_participants": 8,
        }))
        .unwrap();
        assert_eq!(request.min_teams, 2);
        assert_eq!(request.players_per_team, 1);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let update: UpdateTournamentRequest =
            serde_json::from_str(r#"{ "description": null }"#).unwrap();
        assert_eq!(update.description, Some(None));
        assert_eq!(update.starts_at, None);

        let update: UpdateTournamentRequest =
            serde_json::from_str(r#"{ "starts_at": "2026-05-01T10:00:00Z" }"#).unwrap();
        assert_eq!(
            update.starts_at,
            Some(Some("2026-05-01T10:00:00Z".to_owned()))
        );
    }

    #[test]
    fn update_rejects_out_of_range_values() {
        let update = UpdateTournamentRequest {
            max_participants: Some(1),
            starts_at: Some(Some("soon".into())),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("max_participants"));
        assert!(fields.contains_key("starts_at"));
    }
}
