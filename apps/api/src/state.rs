use std::sync::Arc;

use crate::config::Config;
use crate::language::LanguageDetector;
use crate::layout::PageConfig;
use crate::llm_client::Translator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable translator. Production: `LlmTranslator`.
    pub translator: Arc<dyn Translator>,
    /// Pluggable language detector. Default: `WhatlangDetector`.
    pub detector: Arc<dyn LanguageDetector>,
    /// Page geometry for PDF rendering, derived from `PAGE_SIZE`.
    pub page_config: PageConfig,
}
