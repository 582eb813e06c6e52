//! Composition root: wires configuration, storage and the backend into a
//! `StudySession`.

use anyhow::{Result, anyhow};
use docent_application::{QueryOrchestrator, StudySession};
use docent_core::{CredentialStore, GenerativeBackend, GroundingPolicy};
use docent_infrastructure::{ConfigService, DocentPaths, FileCredentialStore};
use docent_interaction::GeminiApiBackend;
use std::sync::Arc;

pub fn bootstrap(paths: &DocentPaths, model_override: Option<String>) -> Result<StudySession> {
    let mut config = ConfigService::load(paths)
        .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    if let Some(model) = model_override {
        config.backend.model = model;
    }

    let credential_store: Arc<dyn CredentialStore> = Arc::new(
        FileCredentialStore::open_default(paths)
            .map_err(|e| anyhow!("Failed to open credential store: {}", e))?,
    );

    let backend: Arc<dyn GenerativeBackend> = Arc::new(
        GeminiApiBackend::new(&config.backend)
            .map_err(|e| anyhow!("Failed to initialize Gemini backend: {}", e))?,
    );

    tracing::info!(
        model = %config.backend.model,
        timeout_secs = config.backend.request_timeout_secs,
        "[Bootstrap] Backend configured"
    );

    let orchestrator = Arc::new(QueryOrchestrator::new(
        backend,
        credential_store,
        GroundingPolicy::default(),
    ));

    Ok(StudySession::new(orchestrator))
}
