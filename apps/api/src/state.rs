use std::sync::Arc;

use crate::advisory::tone::PhraseSelector;
use crate::llm_client::TextGenerator;
use crate::refdata::ReferenceData;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable reference tables, loaded and validated once at startup.
    pub reference: Arc<ReferenceData>,
    /// Pluggable advisory text generator. Default: GeminiClient.
    pub generator: Arc<dyn TextGenerator>,
    /// Phrase selection strategy. Random in production; tests inject a
    /// deterministic selector to pin prompt output.
    pub selector: Arc<dyn PhraseSelector>,
}
