//! Dashboard figures for the admin back-office.

use crate::{dto::admin::StatsResponse, error::ServiceError, state::SharedState};

/// Row counts straight from storage; a storage failure is an error, never zeros.
pub async fn stats(state: &SharedState) -> Result<StatsResponse, ServiceError> {
    let store = state.require_store().await?;
    Ok(store.stats().await?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::models::Role,
        services::{join_request_service, testing},
    };

    #[tokio::test]
    async fn counts_follow_storage() {
        let state = testing::state().await;
        let creator = testing::user(&state, "creator", Role::User).await;
        let player = testing::user(&state, "player", Role::User).await;
        let tid = testing::tournament(&state, &creator, 4).await;
        join_request_service::request_join(&state, &player, tid)
            .await
            .unwrap();

        let stats = stats(&state).await.unwrap();

        assert_eq!(stats.users, 2);
        assert_eq!(stats.games, 1);
        assert_eq!(stats.tournaments, 1);
        assert_eq!(stats.teams, 0);
        assert_eq!(stats.pending_join_requests, 1);
        assert_eq!(stats.new_contacts, 0);
    }

    #[tokio::test]
    async fn degraded_mode_is_an_error() {
        let state = testing::state().await;
        state.clear_store().await;
        assert!(matches!(stats(&state).await, Err(ServiceError::Degraded)));
    }
}
