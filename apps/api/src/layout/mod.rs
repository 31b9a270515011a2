// Page rendering: parsed sections -> positioned text runs -> PDF bytes.
// Layout is CPU-bound; async callers must run it inside tokio::task::spawn_blocking.

pub mod cursor;
pub mod document;
pub mod font_metrics;
pub mod pdf;
pub mod renderer;
pub mod wrap;

pub use document::PageDocument;
pub use font_metrics::{default_page_config, PageConfig, PaperSize};
pub use renderer::render_sections;

use tracing::info;

use crate::sections::parse_sections;

/// Parses raw CV text and lays it out without serializing.
pub fn layout_document(text: &str, config: &PageConfig) -> PageDocument {
    let parsed = parse_sections(text);
    render_sections(&parsed, config)
}

/// Parses raw CV text and renders it to a complete PDF file.
///
/// Never fails: empty or malformed text still produces a valid one-page PDF.
pub fn render_document(text: &str, config: &PageConfig) -> Vec<u8> {
    let document = layout_document(text, config);
    let bytes = pdf::write_pdf(&document, config);
    info!(
        pages = document.page_count(),
        bytes = bytes.len(),
        "Rendered CV document"
    );
    bytes
}
