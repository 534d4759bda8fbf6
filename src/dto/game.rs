use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{GameEntity, TournamentTypeEntity},
    dto::{format_system_time, validation::validate_not_blank},
};

/// Game catalogue entry as exposed by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GameResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GameEntity> for GameResponse {
    fn from(game: GameEntity) -> Self {
        Self {
            id: game.id,
            name: game.name,
            description: game.description,
            image_url: game.image_url,
            created_at: format_system_time(game.created_at),
            updated_at: format_system_time(game.updated_at),
        }
    }
}

/// Payload for creating a game, or replacing one through `PUT`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GameInput {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Plain URL of a cover image hosted elsewhere.
    #[serde(default)]
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Tournament format such as single elimination or round robin.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TournamentTypeResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<TournamentTypeEntity> for TournamentTypeResponse {
    fn from(kind: TournamentTypeEntity) -> Self {
        Self {
            id: kind.id,
            name: kind.name,
            description: kind.description,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TournamentTypeInput {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}
