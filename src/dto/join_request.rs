use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{JoinRequestEntity, JoinRequestStatus},
    dto::format_system_time,
};

/// A user's request to join a tournament.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JoinRequestResponse {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub user_id: Uuid,
    pub status: JoinRequestStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<JoinRequestEntity> for JoinRequestResponse {
    fn from(request: JoinRequestEntity) -> Self {
        Self {
            id: request.id,
            tournament_id: request.tournament_id,
            user_id: request.user_id,
            status: request.status,
            created_at: format_system_time(request.created_at),
            updated_at: format_system_time(request.updated_at),
        }
    }
}

/// Moderation decision on a join request: `accepted` or `rejected`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JoinRequestDecision {
    pub status: JoinRequestStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JoinRequestListQuery {
    pub status: Option<JoinRequestStatus>,
}
