use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report degraded mode while logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        Err(_) => warn!("storage unavailable (degraded mode)"),
    }

    if state.is_degraded() {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::TokenKeys,
        config::AppConfig,
        services::testing,
        state::AppState,
    };

    #[tokio::test]
    async fn reports_degraded_until_a_store_is_installed() {
        let state = AppState::new(
            AppConfig::default(),
            TokenKeys::ephemeral(std::time::Duration::from_secs(60)),
        );
        assert_eq!(health_status(&state).await.status, "degraded");

        let ready = testing::state().await;
        assert_eq!(health_status(&ready).await.status, "ok");
    }
}
