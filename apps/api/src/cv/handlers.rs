use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::ingest::extract_text;
use crate::language::{is_supported_target, language_name, speech_locale, TARGET_LANGUAGES};
use crate::layout::render_document;
use crate::sections::{parse_sections, ParsedDocument};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";
const DEFAULT_PDF_FILENAME: &str = "translated_cv.pdf";

// ────────────────────────────────────────────────────────────────────────────
// Request / response models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub original_text: String,
    pub detected_language: String,
    pub language_name: &'static str,
    pub sections: ParsedDocument,
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub sections: ParsedDocument,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
    /// Detected from `text` when absent.
    #[serde(default)]
    pub source_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub target_language_name: &'static str,
    pub speech_locale: &'static str,
    pub sections: ParsedDocument,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    #[serde(default)]
    pub filename: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cv/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((bytes, content_type, filename));
        break;
    }

    let (bytes, content_type, filename) = upload.ok_or_else(|| {
        AppError::Validation(format!("multipart field '{UPLOAD_FIELD}' is required"))
    })?;

    if bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "upload is {} bytes, limit is {}",
            bytes.len(),
            state.config.max_upload_bytes
        )));
    }

    info!(
        filename = filename.as_deref().unwrap_or("<unnamed>"),
        bytes = bytes.len(),
        "Received CV upload"
    );

    // PDF extraction is CPU-bound.
    let original_text = tokio::task::spawn_blocking(move || {
        extract_text(&bytes, content_type.as_deref(), filename.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in ingest: {e}")))??;

    let detected_language = state.detector.detect(&original_text);
    let sections = parse_sections(&original_text);

    Ok(Json(UploadResponse {
        language_name: language_name(&detected_language),
        detected_language,
        sections,
        original_text,
    }))
}

/// POST /api/v1/cv/parse
pub async fn handle_parse(Json(req): Json<ParseRequest>) -> Json<ParseResponse> {
    Json(ParseResponse {
        sections: parse_sections(&req.text),
    })
}

/// POST /api/v1/cv/translate
pub async fn handle_translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    let target_language = req.target_language.trim().to_ascii_lowercase();
    if !is_supported_target(&target_language) {
        return Err(AppError::Validation(format!(
            "unsupported target_language '{}' (expected one of {})",
            req.target_language,
            TARGET_LANGUAGES.join(", ")
        )));
    }

    let source_language = match req.source_language.as_deref().map(str::trim) {
        Some(tag) if !tag.is_empty() => tag.to_ascii_lowercase(),
        _ => state.detector.detect(&req.text),
    };
    if source_language == target_language {
        warn!(language = %source_language, "Translating CV into its own language");
    }

    let translated_text = state
        .translator
        .translate(&req.text, &source_language, &target_language)
        .await?;
    let sections = parse_sections(&translated_text);

    Ok(Json(TranslateResponse {
        target_language_name: language_name(&target_language),
        speech_locale: speech_locale(&target_language),
        translated_text,
        source_language,
        target_language,
        sections,
    }))
}

/// POST /api/v1/cv/render
pub async fn handle_render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let filename = attachment_filename(req.filename.as_deref());
    let page_config = state.page_config.clone();
    let text = req.text;

    // Layout is CPU-bound.
    let pdf = tokio::task::spawn_blocking(move || render_document(&text, &page_config))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        pdf,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

/// Reduces a client-supplied name to a safe `*.pdf` header value.
fn attachment_filename(requested: Option<&str>) -> String {
    let cleaned: String = requested
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let stem = cleaned.trim_matches('.');
    if stem.is_empty() {
        return DEFAULT_PDF_FILENAME.to_string();
    }
    if stem.to_ascii_lowercase().ends_with(".pdf") {
        stem.to_string()
    } else {
        format!("{stem}.pdf")
    }
}
