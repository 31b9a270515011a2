//! Uploaded file -> raw CV text.
//!
//! PDFs go through `pdf-extract`; anything else is decoded as UTF-8 with
//! invalid sequences replaced. PDF extraction is CPU-bound: async callers run
//! `extract_text` inside `tokio::task::spawn_blocking`.

use thiserror::Error;
use tracing::{debug, warn};

const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("uploaded file is empty")]
    Empty,

    #[error("could not extract text from PDF: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("no text found in uploaded file")]
    NoText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    PlainText,
}

/// Decides how to read an upload from its declared content type, its file
/// name, and finally its leading bytes.
pub fn classify(bytes: &[u8], content_type: Option<&str>, filename: Option<&str>) -> SourceKind {
    let declared_pdf = content_type
        .map(|ct| ct.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false);
    let named_pdf = filename
        .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false);

    if declared_pdf || named_pdf || bytes.starts_with(PDF_MAGIC) {
        SourceKind::Pdf
    } else {
        SourceKind::PlainText
    }
}

/// Extracts the raw text of an uploaded CV.
pub fn extract_text(
    bytes: &[u8],
    content_type: Option<&str>,
    filename: Option<&str>,
) -> Result<String, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::Empty);
    }

    let kind = classify(bytes, content_type, filename);
    let text = match kind {
        SourceKind::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            warn!("PDF text extraction failed: {e}");
            IngestError::Pdf(e)
        })?,
        SourceKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    if text.trim().is_empty() {
        return Err(IngestError::NoText);
    }

    debug!(?kind, bytes = bytes.len(), chars = text.chars().count(), "Extracted upload text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_content_type() {
        assert_eq!(
            classify(b"hello", Some("application/pdf"), None),
            SourceKind::Pdf
        );
        assert_eq!(
            classify(b"hello", Some("text/plain"), Some("cv.txt")),
            SourceKind::PlainText
        );
    }

    #[test]
    fn test_classify_by_filename_and_magic() {
        assert_eq!(classify(b"hello", None, Some("CV.PDF")), SourceKind::Pdf);
        assert_eq!(classify(b"%PDF-1.7\n", None, None), SourceKind::Pdf);
    }

    #[test]
    fn test_plain_text_is_decoded_lossily() {
        let bytes = b"Jane Doe\n\xff**Experience**";
        let text = extract_text(bytes, Some("text/plain"), Some("cv.txt")).unwrap();
        assert!(text.starts_with("Jane Doe\n"));
        assert!(text.ends_with("**Experience**"));
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        assert!(matches!(
            extract_text(b"", None, None),
            Err(IngestError::Empty)
        ));
    }

    #[test]
    fn test_whitespace_only_upload_has_no_text() {
        assert!(matches!(
            extract_text(b"  \n\t ", Some("text/plain"), None),
            Err(IngestError::NoText)
        ));
    }

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let result = extract_text(b"not really a pdf", Some("application/pdf"), None);
        assert!(matches!(result, Err(IngestError::Pdf(_))));
    }
}
