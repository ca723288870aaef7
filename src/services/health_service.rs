//! Health reporting based on which stores are installed.

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether matches can currently be saved and shared, logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let mut healthy = true;
    match state.require_match_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "match store health check failed");
                healthy = false;
            }
        }
        Err(_) => warn!("match store unavailable (degraded mode)"),
    }

    if healthy && !state.is_degraded().await {
        HealthResponse::ok()
    } else {
        HealthResponse::degraded()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::match_store::MemoryStore, state::AppState};

    #[tokio::test]
    async fn missing_stores_are_degraded() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(health_status(&state).await, HealthResponse::degraded());
    }

    #[tokio::test]
    async fn reachable_stores_are_ok_until_one_fails() {
        let state = AppState::new(AppConfig::default());
        let store = MemoryStore::new();
        state.install_match_store(Arc::new(store.clone())).await;
        state.install_share_store(Arc::new(store.clone())).await;
        assert_eq!(health_status(&state).await, HealthResponse::ok());

        store.set_offline(true);
        assert_eq!(health_status(&state).await, HealthResponse::degraded());
    }
}
