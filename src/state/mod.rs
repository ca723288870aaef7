//! Live match state and the stores installed next to it.

pub mod game;
pub mod scoring;
pub mod state_machine;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::AppConfig,
    dao::match_store::{MatchStore, ShareStore},
    error::ServiceError,
};

pub use self::state_machine::{AbsorbReason, MatchAction, MatchSession, Screen, Transition};

/// Handle to the application state shared across tasks.
pub type SharedState = Arc<AppState>;

/// Host-side state: the live match session and the collaborators it hands off to.
///
/// The session is only mutated through [`AppState::dispatch`], one action at a
/// time under the write lock. Anything leaving this struct is a clone.
pub struct AppState {
    config: AppConfig,
    session: RwLock<MatchSession>,
    match_store: RwLock<Option<Arc<dyn MatchStore>>>,
    share_store: RwLock<Option<Arc<dyn ShareStore>>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// No store is installed yet, so persistence and sharing start out degraded.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            session: RwLock::new(MatchSession::new()),
            match_store: RwLock::new(None),
            share_store: RwLock::new(None),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Apply an action to the live session and return the outcome with a copy of the result.
    pub async fn dispatch(&self, action: MatchAction) -> (Transition, MatchSession) {
        let mut session = self.session.write().await;
        let transition = session.apply(action);
        if let Transition::Absorbed(reason) = transition {
            debug!(?reason, screen = ?session.screen, "action absorbed");
        }
        (transition, session.clone())
    }

    /// Copy of the live session, safe to hand to persistence or sharing.
    pub async fn session_snapshot(&self) -> MatchSession {
        self.session.read().await.clone()
    }

    /// Obtain a handle to the current match store, if one is installed.
    pub async fn match_store(&self) -> Option<Arc<dyn MatchStore>> {
        self.match_store.read().await.as_ref().cloned()
    }

    /// Install a match store implementation.
    pub async fn install_match_store(&self, store: Arc<dyn MatchStore>) {
        *self.match_store.write().await = Some(store);
    }

    /// Match store or a degraded-mode error.
    pub async fn require_match_store(&self) -> Result<Arc<dyn MatchStore>, ServiceError> {
        self.match_store().await.ok_or(ServiceError::Degraded)
    }

    /// Obtain a handle to the current share store, if one is installed.
    pub async fn share_store(&self) -> Option<Arc<dyn ShareStore>> {
        self.share_store.read().await.as_ref().cloned()
    }

    /// Install a share store implementation.
    pub async fn install_share_store(&self, store: Arc<dyn ShareStore>) {
        *self.share_store.write().await = Some(store);
    }

    /// Share store or a degraded-mode error.
    pub async fn require_share_store(&self) -> Result<Arc<dyn ShareStore>, ServiceError> {
        self.share_store().await.ok_or(ServiceError::Degraded)
    }

    /// Whether any collaborator store is missing.
    pub async fn is_degraded(&self) -> bool {
        self.match_store.read().await.is_none() || self.share_store.read().await.is_none()
    }
}
