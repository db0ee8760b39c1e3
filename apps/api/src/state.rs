use std::sync::Arc;

use crate::evaluation::validator::ValidationMode;
use crate::llm_client::ModelService;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Model boundary. Production: `LlmClient`; tests swap in a scripted stub.
    pub model: Arc<dyn ModelService>,
    pub validation_mode: ValidationMode,
}
