use std::sync::Arc;

use crate::advisory::submission::SubmissionGate;
use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generator. Default: GeminiClient. Tests inject a stub.
    pub generator: Arc<dyn TextGenerator>,
    /// Single-flight gate for advisory submissions.
    pub gate: SubmissionGate,
    pub config: Config,
}
