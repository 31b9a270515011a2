//! Translation: pluggable, trait-based CV translator.
//!
//! `AppState` holds an `Arc<dyn Translator>`; production uses `LlmTranslator`.

use async_trait::async_trait;
use tracing::info;

use crate::language::language_name;
use crate::llm_client::prompts::{build_translation_prompt, TRANSLATION_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};

/// Translates CV text between two languages given as ISO 639-1 tags.
/// Implementations must keep the heading and bullet markup intact.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, LlmError>;
}

/// Translator backed by the chat-completions client.
pub struct LlmTranslator {
    llm: LlmClient,
}

impl LlmTranslator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, LlmError> {
        let prompt = build_translation_prompt(
            language_name(source_language),
            language_name(target_language),
            text,
        );
        info!(
            model = self.llm.model(),
            source_language,
            target_language,
            chars = text.chars().count(),
            "Translating CV"
        );
        self.llm.call_text(&prompt, TRANSLATION_SYSTEM).await
    }
}
