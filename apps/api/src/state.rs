use std::sync::Arc;

use crate::config::Config;
use crate::extraction::ExtractorRegistry;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; nothing here is shared between evaluations except configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Media-type keyed document extractors (PDF and DOCX by default).
    pub extractors: ExtractorRegistry,
    /// Model backend. `GeminiClient` in production, stubbed in tests.
    pub llm: Arc<dyn TextGenerator>,
}
