use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Per-tournament async locks serializing the capacity check and the participant
/// insert of concurrent acceptances. Only effective inside one process.
///
/// Entries live until their tournament is deleted, so the map is bounded by the
/// number of live tournaments.
#[derive(Default)]
pub struct AdmissionGates {
    gates: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl AdmissionGates {
    /// Wait for exclusive admission rights on `tournament_id`.
    pub async fn acquire(&self, tournament_id: Uuid) -> OwnedMutexGuard<()> {
        let gate = self.gates.entry(tournament_id).or_default().clone();
        gate.lock_owned().await
    }

    /// Drop the gate of a deleted tournament.
    pub fn forget(&self, tournament_id: Uuid) {
        self.gates.remove(&tournament_id);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.gates.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn same_tournament_is_exclusive() {
        let gates = AdmissionGates::default();
        let id = Uuid::new_v4();

        let held = gates.acquire(id).await;
        let second = timeout(Duration::from_millis(50), gates.acquire(id)).await;
        assert!(second.is_err(), "second acquire must wait for the first guard");

        drop(held);
        let second = timeout(Duration::from_millis(50), gates.acquire(id)).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn different_tournaments_do_not_block_each_other() {
        let gates = AdmissionGates::default();
        let _first = gates.acquire(Uuid::new_v4()).await;
        let other = timeout(Duration::from_millis(50), gates.acquire(Uuid::new_v4())).await;
        assert!(other.is_ok());
        assert_eq!(gates.len(), 2);
    }

    #[tokio::test]
    async fn forget_removes_the_gate() {
        let gates = AdmissionGates::default();
        let id = Uuid::new_v4();
        drop(gates.acquire(id).await);
        gates.forget(id);
        assert_eq!(gates.len(), 0);
    }
}
