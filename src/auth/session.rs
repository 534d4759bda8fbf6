use std::time::SystemTime;

use dashmap::DashMap;
use uuid::Uuid;

use super::token::unix_seconds;

/// Session ids revoked by logout, kept until the matching token would expire anyway.
#[derive(Default)]
pub struct SessionRegistry {
    revoked: DashMap<Uuid, u64>,
}

impl SessionRegistry {
    pub fn revoke(&self, session_id: Uuid, expires_at: u64) {
        self.purge_expired(unix_seconds(SystemTime::now()));
        self.revoked.insert(session_id, expires_at);
    }

    pub fn is_revoked(&self, session_id: Uuid) -> bool {
        self.revoked.contains_key(&session_id)
    }

    fn purge_expired(&self, now: u64) {
        self.revoked.retain(|_, expires_at| *expires_at > now);
    }
}
