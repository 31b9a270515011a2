//! Language identification and display mappings.
//!
//! `AppState` holds an `Arc<dyn LanguageDetector>`; the default backend is
//! `WhatlangDetector`, a trigram classifier from the `whatlang` crate.

use tracing::debug;
use whatlang::Lang;

/// Only the head of a document is inspected.
pub const DETECTION_SAMPLE_CHARS: usize = 1000;

/// Languages a CV can be translated into.
pub const TARGET_LANGUAGES: [&str; 2] = ["en", "fr"];

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Identifies the language of a CV. Returns a two-letter ISO 639-1 tag and
/// never fails: backends fall back to a configured default.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> String;
}

// ────────────────────────────────────────────────────────────────────────────
// WhatlangDetector
// ────────────────────────────────────────────────────────────────────────────

/// Best-guess classifier over the first `DETECTION_SAMPLE_CHARS` characters.
/// Text with no detectable language, or a language without a two-letter tag
/// below, yields the fallback tag.
#[derive(Debug, Clone)]
pub struct WhatlangDetector {
    fallback: String,
}

impl WhatlangDetector {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> String {
        let sample: String = text.chars().take(DETECTION_SAMPLE_CHARS).collect();

        let detected = whatlang::detect(&sample)
            .and_then(|info| iso_639_1(info.lang()).map(|tag| (tag, info)));
        match detected {
            Some((tag, info)) => {
                debug!(
                    language = tag,
                    confidence = info.confidence(),
                    reliable = info.is_reliable(),
                    "Detected language"
                );
                tag.to_string()
            }
            None => {
                debug!(fallback = %self.fallback, "Language detection inconclusive, using fallback");
                self.fallback.clone()
            }
        }
    }
}

fn iso_639_1(lang: Lang) -> Option<&'static str> {
    let tag = match lang {
        Lang::Eng => "en",
        Lang::Fra => "fr",
        Lang::Spa => "es",
        Lang::Ara => "ar",
        Lang::Deu => "de",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Rus => "ru",
        Lang::Nld => "nl",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Ukr => "uk",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        _ => return None,
    };
    Some(tag)
}

// ────────────────────────────────────────────────────────────────────────────
// Display mappings
// ────────────────────────────────────────────────────────────────────────────

pub fn is_supported_target(tag: &str) -> bool {
    TARGET_LANGUAGES.contains(&tag)
}

/// English display name for a language tag; `"Unknown"` otherwise.
pub fn language_name(tag: &str) -> &'static str {
    match tag {
        "en" => "English",
        "fr" => "French",
        "es" => "Spanish",
        "ar" => "Arabic",
        "de" => "German",
        "pt" => "Portuguese",
        "it" => "Italian",
        "ru" => "Russian",
        _ => "Unknown",
    }
}

/// BCP 47 locale used for speech synthesis hints. Defaults to `en-US`.
pub fn speech_locale(tag: &str) -> &'static str {
    match tag {
        "en" => "en-US",
        "fr" => "fr-FR",
        "es" => "es-ES",
        "ar" => "ar-SA",
        "de" => "de-DE",
        "pt" => "pt-PT",
        "it" => "it-IT",
        "ru" => "ru-RU",
        _ => "en-US",
    }
}
