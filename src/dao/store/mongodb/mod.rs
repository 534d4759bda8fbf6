mod config;
mod connection;
mod error;
mod models;
pub mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoArenaStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        if let Some(collection) = err.duplicate_key_collection() {
            return StorageError::conflict(conflict_label(collection));
        }
        if err.is_connectivity() {
            StorageError::unavailable(err.to_string(), err)
        } else {
            StorageError::backend(err.to_string(), err)
        }
    }
}

/// Name the unique key a collection enforces, matching the in-memory backend.
fn conflict_label(collection: &'static str) -> &'static str {
    match collection {
        models::USERS => "user email",
        models::GAMES => "game name",
        models::TOURNAMENT_TYPES => "tournament type name",
        models::JOIN_REQUESTS => "join request",
        models::PARTICIPANTS => "participant",
        models::TEAMS => "team name",
        models::TEAM_MEMBERS => "team member",
        other => other,
    }
}
