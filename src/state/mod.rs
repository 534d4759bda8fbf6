pub mod admission;
pub mod lifecycle;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    auth::{SessionRegistry, TokenKeys},
    config::AppConfig,
    dao::store::ArenaStore,
    error::ServiceError,
};

pub use self::admission::AdmissionGates;

pub type SharedState = Arc<AppState>;

/// Central application state holding the storage handle and in-process registries.
pub struct AppState {
    store: RwLock<Option<Arc<dyn ArenaStore>>>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
    tokens: TokenKeys,
    sessions: SessionRegistry,
    admission: AdmissionGates,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig, tokens: TokenKeys) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            degraded: degraded_tx,
            config,
            tokens,
            sessions: SessionRegistry::default(),
            admission: AdmissionGates::default(),
        })
    }

    /// Build a state with `store` already installed and degraded mode off.
    pub async fn with_store(
        config: AppConfig,
        tokens: TokenKeys,
        store: Arc<dyn ArenaStore>,
    ) -> SharedState {
        let state = Self::new(config, tokens);
        state.set_store(store).await;
        state
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn ArenaStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store, or [`ServiceError::Degraded`] while storage is unavailable.
    pub async fn require_store(&self) -> Result<Arc<dyn ArenaStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn set_store(&self, store: Arc<dyn ArenaStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenKeys {
        &self.tokens
    }

    /// Registry of sessions revoked by logout.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Per-tournament gates serializing participant admission.
    pub fn admission(&self) -> &AdmissionGates {
        &self.admission
    }
}
