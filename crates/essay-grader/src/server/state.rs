//! Application state for the grading server

use std::sync::Arc;

use crate::config::GraderConfig;
use crate::error::Result;
use crate::evaluation::{router::RoutingTable, EvaluationRouter};
use crate::extraction::ExtractionOrchestrator;
use crate::providers::{ChatProvider, GeminiClient, GithubModelsClient, MultimodalProvider};
use crate::storage::{LocalUploadStore, UploadStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration, read-only after startup
    config: GraderConfig,
    /// Batch extraction pipeline
    orchestrator: ExtractionOrchestrator,
    /// Evaluation dispatch
    router: EvaluationRouter,
    /// Staged upload storage
    store: Arc<dyn UploadStore>,
}

impl AppState {
    /// Create application state with the remote providers described by `config`
    pub fn new(config: GraderConfig) -> Result<Self> {
        let gemini = Arc::new(GeminiClient::new(&config.gemini)?);

        let github = Arc::new(GithubModelsClient::new(&config.github)?);
        tracing::info!(
            "GitHub Models client initialized (endpoint: {})",
            config.github.endpoint
        );

        Ok(Self::from_providers(
            config,
            gemini,
            github,
            Arc::new(LocalUploadStore),
        ))
    }

    /// Create application state from already constructed providers
    pub fn from_providers(
        config: GraderConfig,
        multimodal: Arc<dyn MultimodalProvider>,
        chat: Arc<dyn ChatProvider>,
        store: Arc<dyn UploadStore>,
    ) -> Self {
        let orchestrator = ExtractionOrchestrator::new(Arc::clone(&multimodal), Arc::clone(&store));
        let router = EvaluationRouter::new(multimodal, chat, RoutingTable::from_config(&config));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
                router,
                store,
            }),
        }
    }

    pub fn config(&self) -> &GraderConfig {
        &self.inner.config
    }

    pub fn orchestrator(&self) -> &ExtractionOrchestrator {
        &self.inner.orchestrator
    }

    pub fn router(&self) -> &EvaluationRouter {
        &self.inner.router
    }

    pub fn store(&self) -> &dyn UploadStore {
        self.inner.store.as_ref()
    }
}
