use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{RecommendError, RecommendResult};
use crate::orchestrator::RecommendationOrchestrator;

/// Model lifecycle as seen by the HTTP layer
#[derive(Clone)]
pub enum Readiness {
    /// Artifacts are still being loaded
    Loading,
    Ready(Arc<RecommendationOrchestrator>),
    /// Loading failed; the process needs new artifacts and a restart
    Failed(String),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<RwLock<Readiness>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State for a server whose artifacts are still loading
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Readiness::Loading)),
        }
    }

    /// State for a server with the model already loaded
    pub fn ready(orchestrator: RecommendationOrchestrator) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Readiness::Ready(Arc::new(orchestrator)))),
        }
    }

    pub async fn set_ready(&self, orchestrator: RecommendationOrchestrator) {
        *self.inner.write().await = Readiness::Ready(Arc::new(orchestrator));
    }

    pub async fn set_failed(&self, reason: impl Into<String>) {
        *self.inner.write().await = Readiness::Failed(reason.into());
    }

    pub async fn readiness(&self) -> Readiness {
        self.inner.read().await.clone()
    }

    /// The orchestrator, or `NotReady` while loading or after a failed load.
    ///
    /// Never waits for loading to finish.
    pub async fn orchestrator(&self) -> RecommendResult<Arc<RecommendationOrchestrator>> {
        match &*self.inner.read().await {
            Readiness::Ready(orchestrator) => Ok(orchestrator.clone()),
            Readiness::Loading | Readiness::Failed(_) => Err(RecommendError::NotReady),
        }
    }
}
