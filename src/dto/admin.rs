//! DTO definitions used only by the admin dashboard.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::StatsEntity;

/// Row counts displayed on the admin dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub users: u64,
    pub games: u64,
    pub tournaments: u64,
    pub teams: u64,
    pub pending_join_requests: u64,
    pub new_contacts: u64,
}

impl From<StatsEntity> for StatsResponse {
    fn from(stats: StatsEntity) -> Self {
        Self {
            users: stats.users,
            games: stats.games,
            tournaments: stats.tournaments,
            teams: stats.teams,
            pending_join_requests: stats.pending_join_requests,
            new_contacts: stats.new_contacts,
        }
    }
}
