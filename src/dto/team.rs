use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{TeamEntity, TeamMemberEntity, TeamRole},
    dto::{format_system_time, validation::validate_not_blank},
};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TeamNameRequest {
    #[validate(length(min = 2, max = 50), custom(function = "validate_not_blank"))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeamListQuery {
    pub tournament_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamMemberResponse {
    pub user_id: Uuid,
    /// Empty when the account no longer exists.
    pub username: String,
    pub role: TeamRole,
    pub joined_at: String,
}

impl TeamMemberResponse {
    pub fn new(member: TeamMemberEntity, username: String) -> Self {
        Self {
            user_id: member.user_id,
            username,
            role: member.role,
            joined_at: format_system_time(member.created_at),
        }
    }
}

/// Team with its roster, captain first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    pub captain_id: Uuid,
    pub created_at: String,
    pub members: Vec<TeamMemberResponse>,
}

impl TeamResponse {
    pub fn new(team: TeamEntity, members: Vec<TeamMemberResponse>) -> Self {
        Self {
            id: team.id,
            tournament_id: team.tournament_id,
            name: team.name,
            captain_id: team.captain_id,
            created_at: format_system_time(team.created_at),
            members,
        }
    }
}
