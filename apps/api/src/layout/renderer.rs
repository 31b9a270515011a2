//! Page Renderer: lays a `ParsedDocument` out onto fixed-size pages.
//!
//! # Layout
//! - Header: the first header line (asterisks stripped) as a centered bold name,
//!   the remaining header lines joined with `" | "` as a centered wrapped line.
//! - Every other non-empty section: a full-width accent banner with the key in
//!   capitals, then its paragraph blocks (sub-heading, bullets, plain lines).
//! - Footer: `Page N` centered inside the bottom reserve of every page.
//!
//! Layout never fails: absent sections render as nothing, an absent header as
//! blank space.

use tracing::debug;

use crate::layout::cursor::LayoutCursor;
use crate::layout::document::{Color, Element, FilledRect, Page, PageDocument, TextRun};
use crate::layout::font_metrics::{get_metrics, FontFace, PageConfig, MM_PER_PT};
use crate::layout::wrap::{fit_to_width, wrap_text};
use crate::sections::blocks::truncate_line;
use crate::sections::{paragraph_blocks, ParsedDocument, RenderItem, HEADER_SECTION};

// ────────────────────────────────────────────────────────────────────────────
// Styles and spacing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    face: FontFace,
    size_pt: f32,
    color: Color,
}

const NAME_STYLE: TextStyle = TextStyle {
    face: FontFace::Bold,
    size_pt: 16.0,
    color: Color::rgb(50, 50, 50),
};
const CONTACT_STYLE: TextStyle = TextStyle {
    face: FontFace::Regular,
    size_pt: 9.0,
    color: Color::BLACK,
};
const BANNER_STYLE: TextStyle = TextStyle {
    face: FontFace::Bold,
    size_pt: 11.0,
    color: Color::WHITE,
};
const TITLE_STYLE: TextStyle = TextStyle {
    face: FontFace::Bold,
    size_pt: 10.0,
    color: Color::rgb(80, 80, 80),
};
const BODY_STYLE: TextStyle = TextStyle {
    face: FontFace::Regular,
    size_pt: 9.0,
    color: Color::BLACK,
};
const FOOTER_STYLE: TextStyle = TextStyle {
    face: FontFace::Italic,
    size_pt: 8.0,
    color: Color::rgb(128, 128, 128),
};

/// Banner fill.
pub const ACCENT_COLOR: Color = Color::rgb(0, 102, 204);

const NAME_LINE_MM: f32 = 10.0;
const CONTACT_LINE_MM: f32 = 5.0;
const HEADER_GAP_MM: f32 = 5.0;
const BANNER_HEIGHT_MM: f32 = 7.0;
const BANNER_GAP_MM: f32 = 1.0;
const TITLE_LINE_MM: f32 = 5.0;
const BODY_LINE_MM: f32 = 4.0;
const BULLET_COLUMN_MM: f32 = 3.0;
const BULLET_INDENT_MM: f32 = 5.0;
const ITEM_GAP_MM: f32 = 2.0;
const SECTION_GAP_MM: f32 = 3.0;
const FOOTER_CELL_MM: f32 = 10.0;

const CONTACT_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Lays out a parsed CV. Pure: the same input always yields the same pages.
pub fn render_sections(parsed: &ParsedDocument, config: &PageConfig) -> PageDocument {
    let mut renderer = PageRenderer::new(config);
    let name = renderer.header(parsed.get(HEADER_SECTION));

    for (key, body) in parsed.non_empty() {
        if key == HEADER_SECTION {
            continue;
        }
        renderer.section(key, body);
    }

    let mut pages = renderer.cursor.into_pages();
    for page in &mut pages {
        paint_footer(page, config);
    }
    debug!(pages = pages.len(), "Laid out CV");

    PageDocument {
        title: (!name.is_empty()).then_some(name),
        pages,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

struct PageRenderer<'a> {
    cursor: LayoutCursor<'a>,
}

impl<'a> PageRenderer<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            cursor: LayoutCursor::new(config),
        }
    }

    fn config(&self) -> &PageConfig {
        self.cursor.config()
    }

    /// Renders the name and contact block; returns the name.
    fn header(&mut self, body: &str) -> String {
        let mut lines = body.split('\n');
        let name = lines
            .next()
            .map(|line| line.trim_matches('*').trim().to_string())
            .unwrap_or_default();
        let contact = lines
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(CONTACT_SEPARATOR);

        let left = self.config().margin_mm;
        let width = self.config().content_width_mm();
        self.paragraph(&name, NAME_STYLE, left, width, NAME_LINE_MM, Align::Center);
        self.paragraph(&contact, CONTACT_STYLE, left, width, CONTACT_LINE_MM, Align::Center);
        self.cursor.advance(HEADER_GAP_MM);
        name
    }

    fn section(&mut self, key: &str, body: &str) {
        self.banner(key);
        for block in paragraph_blocks(body) {
            for item in &block {
                self.item(item);
            }
            self.cursor.advance(ITEM_GAP_MM);
        }
        self.cursor.advance(SECTION_GAP_MM);
    }

    fn banner(&mut self, key: &str) {
        self.cursor.ensure(BANNER_HEIGHT_MM);
        let left = self.config().margin_mm;
        let width = self.config().content_width_mm();
        let padding = self.config().cell_padding_mm;
        let top = self.cursor.y();

        self.cursor.push(Element::Fill(FilledRect {
            x_mm: left,
            y_mm: top,
            width_mm: width,
            height_mm: BANNER_HEIGHT_MM,
            color: ACCENT_COLOR,
        }));
        let metrics = get_metrics(BANNER_STYLE.face);
        let label = fit_to_width(
            &format!(" {}", truncate_line(key).to_uppercase()),
            metrics,
            BANNER_STYLE.size_pt,
            width - 2.0 * padding,
        );
        self.place(&label, BANNER_STYLE, left, width, BANNER_HEIGHT_MM, Align::Left);
        self.cursor.advance(BANNER_HEIGHT_MM + BANNER_GAP_MM);
    }

    fn item(&mut self, item: &RenderItem) {
        let left = self.config().margin_mm;
        let width = self.config().content_width_mm();
        match item {
            RenderItem::Title { text } => {
                self.paragraph(text, TITLE_STYLE, left, width, TITLE_LINE_MM, Align::Left);
            }
            RenderItem::Bullet { marker, text } => self.bullet(*marker, text),
            RenderItem::Plain { text } => {
                self.paragraph(text, BODY_STYLE, left, width, BODY_LINE_MM, Align::Left);
            }
        }
    }

    /// Bullet glyph in a fixed column; the text wraps in an indented column so
    /// continuation lines align under the first word.
    fn bullet(&mut self, marker: char, text: &str) {
        let left = self.config().margin_mm;
        let text_left = left + BULLET_INDENT_MM;
        let text_width = self.config().content_width_mm() - BULLET_INDENT_MM;

        self.cursor.ensure(BODY_LINE_MM);
        self.place(
            &marker.to_string(),
            BODY_STYLE,
            left,
            BULLET_COLUMN_MM,
            BODY_LINE_MM,
            Align::Left,
        );
        self.paragraph(text, BODY_STYLE, text_left, text_width, BODY_LINE_MM, Align::Left);
    }

    /// Wraps `text` into the cell column `[x, x + width]`, one line per `line_height`.
    fn paragraph(
        &mut self,
        text: &str,
        style: TextStyle,
        x_mm: f32,
        width_mm: f32,
        line_height_mm: f32,
        align: Align,
    ) {
        let padding = self.config().cell_padding_mm;
        let lines = wrap_text(
            text,
            get_metrics(style.face),
            style.size_pt,
            width_mm - 2.0 * padding,
        );
        for line in lines {
            self.cursor.ensure(line_height_mm);
            self.place(&line, style, x_mm, width_mm, line_height_mm, align);
            self.cursor.advance(line_height_mm);
        }
    }

    /// Places one line inside a cell at the cursor without moving the cursor.
    fn place(
        &mut self,
        text: &str,
        style: TextStyle,
        x_mm: f32,
        width_mm: f32,
        height_mm: f32,
        align: Align,
    ) {
        if text.is_empty() {
            return;
        }
        let padding = self.config().cell_padding_mm;
        let run = text_run(text, style, x_mm, self.cursor.y(), width_mm, height_mm, padding, align);
        self.cursor.push(Element::Text(run));
    }
}

#[allow(clippy::too_many_arguments)]
fn text_run(
    text: &str,
    style: TextStyle,
    x_mm: f32,
    top_mm: f32,
    width_mm: f32,
    height_mm: f32,
    padding_mm: f32,
    align: Align,
) -> TextRun {
    let text_width = get_metrics(style.face).width_mm(text, style.size_pt);
    let x = match align {
        Align::Left => x_mm + padding_mm,
        Align::Center => x_mm + (width_mm - text_width) / 2.0,
    };
    TextRun {
        text: text.to_string(),
        x_mm: x,
        baseline_mm: top_mm + 0.5 * height_mm + 0.3 * style.size_pt * MM_PER_PT,
        width_mm: text_width,
        face: style.face,
        size_pt: style.size_pt,
        color: style.color,
    }
}

fn paint_footer(page: &mut Page, config: &PageConfig) {
    let label = format!("Page {}", page.number);
    let top = config.page_height_mm - config.footer_reserve_mm;
    let run = text_run(
        &label,
        FOOTER_STYLE,
        config.margin_mm,
        top,
        config.content_width_mm(),
        FOOTER_CELL_MM,
        config.cell_padding_mm,
        Align::Center,
    );
    page.elements.push(Element::Text(run));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{default_page_config, PaperSize};
    use crate::sections::blocks::{ELLIPSIS, MAX_LINE_CHARS};
    use crate::sections::parse_sections;

    const SAMPLE_CV: &str = "\
Jane Doe
jane@example.com
Paris, France

**Experience**
Software Engineer, Acme Corp
- Built a Rust ingestion pipeline
- Cut p99 latency by 40%

**Skills**
- Rust
- SQL
";

    fn layout(text: &str) -> PageDocument {
        render_sections(&parse_sections(text), &default_page_config(PaperSize::A4))
    }

    fn runs_with_face(doc: &PageDocument, face: FontFace, size_pt: f32) -> Vec<String> {
        doc.text_runs()
            .filter(|r| r.face == face && r.size_pt == size_pt)
            .map(|r| r.text.clone())
            .collect()
    }

    #[test]
    fn test_header_block_name_and_contact() {
        let doc = layout("Jane Doe\njane@example.com\nParis, France\n**Skills**\nRust");
        assert_eq!(runs_with_face(&doc, FontFace::Bold, 16.0), vec!["Jane Doe"]);
        assert_eq!(
            runs_with_face(&doc, FontFace::Regular, 9.0)[0],
            "jane@example.com | Paris, France"
        );
        assert_eq!(doc.title.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_name_is_centered() {
        let config = default_page_config(PaperSize::A4);
        let doc = layout("Jane Doe\n**Skills**\nRust");
        let name = doc.text_runs().find(|r| r.text == "Jane Doe").unwrap();
        let center = name.x_mm + name.width_mm / 2.0;
        assert!((center - config.page_width_mm / 2.0).abs() < 0.01);
    }

    #[test]
    fn test_banners_only_for_non_empty_sections() {
        let doc = layout(SAMPLE_CV);
        let banners = runs_with_face(&doc, FontFace::Bold, 11.0);
        assert_eq!(banners, vec![" EXPERIENCE", " SKILLS"]);
        let fills: Vec<&FilledRect> = doc.pages.iter().flat_map(Page::fills).collect();
        assert_eq!(fills.len(), 2);
        assert!(fills.iter().all(|f| f.color == ACCENT_COLOR && f.width_mm == 190.0));
    }

    #[test]
    fn test_block_title_then_bullets() {
        let doc = layout(SAMPLE_CV);
        assert_eq!(
            runs_with_face(&doc, FontFace::Bold, 10.0),
            vec!["Software Engineer, Acme Corp"]
        );
        let body = runs_with_face(&doc, FontFace::Regular, 9.0);
        assert!(body.contains(&"-".to_string()));
        assert!(body.contains(&"Built a Rust ingestion pipeline".to_string()));
        assert!(body.contains(&"Rust".to_string()));
    }

    #[test]
    fn test_bullet_text_is_indented_past_glyph() {
        let doc = layout(SAMPLE_CV);
        let glyph = doc.text_runs().find(|r| r.text == "-").unwrap();
        let text = doc
            .text_runs()
            .find(|r| r.text == "Built a Rust ingestion pipeline")
            .unwrap();
        assert_eq!(glyph.baseline_mm, text.baseline_mm);
        assert!((text.x_mm - glyph.x_mm - BULLET_INDENT_MM).abs() < 1e-4);
    }

    #[test]
    fn test_empty_input_renders_one_page_without_banners() {
        let doc = layout("");
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].fills().next().is_none());
        let texts: Vec<&str> = doc.text_runs().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Page 1"]);
        assert_eq!(doc.title, None);
    }

    #[test]
    fn test_long_line_truncated_in_output() {
        let long_line = "word ".repeat(40); // 200 characters
        let text = format!("Jane\n**Experience**\n- {}", long_line.trim_end());
        let doc = layout(&text);
        let body: Vec<String> = doc
            .text_runs()
            .filter(|r| r.face == FontFace::Regular && r.size_pt == 9.0 && r.text != "-")
            .map(|r| r.text.clone())
            .collect();
        let rendered = body.join(" ");
        assert!(rendered.ends_with("..."), "got {rendered}");
        let expected: String = format!("- {}", long_line.trim_end()).chars().take(120).collect();
        assert_eq!(
            format!("- {rendered}"),
            format!("{}...", expected.split_whitespace().collect::<Vec<_>>().join(" "))
        );
    }

    #[test]
    fn test_runs_stay_inside_content_width() {
        let config = default_page_config(PaperSize::A4);
        let text = format!(
            "{}\n{}\n**Experience**\n{}\n- {}\n{}",
            "Nn".repeat(45),
            "contact ".repeat(60),
            "Tt".repeat(150),
            "b".repeat(300),
            "p".repeat(300)
        );
        let doc = render_sections(&parse_sections(&text), &config);
        let right_edge = config.page_width_mm - config.margin_mm;
        for run in doc.text_runs() {
            assert!(run.x_mm >= config.margin_mm - 1e-3, "run starts left of margin: {run:?}");
            assert!(
                run.x_mm + run.width_mm <= right_edge + 1e-3,
                "run overflows right margin: {run:?}"
            );
        }
    }

    #[test]
    fn test_long_document_paginates_with_footers() {
        let config = default_page_config(PaperSize::A4);
        let bullets: String = (0..150).map(|i| format!("- Achievement number {i}\n")).collect();
        let text = format!("Jane Doe\n**Experience**\nAcme\n{bullets}");
        let doc = render_sections(&parse_sections(&text), &config);
        assert!(doc.page_count() >= 2);

        for page in &doc.pages {
            let footer = format!("Page {}", page.number);
            assert!(page.text_runs().any(|r| r.text == footer && r.face == FontFace::Italic));
            for run in page.text_runs().filter(|r| r.face != FontFace::Italic) {
                assert!(run.baseline_mm <= config.break_threshold_mm());
            }
        }
    }

    #[test]
    fn test_sections_follow_document_order() {
        let doc = layout("Jane\n**Projects**\nCompiler\n**Education**\nMSc");
        assert_eq!(
            runs_with_face(&doc, FontFace::Bold, 11.0),
            vec![" PROJECTS", " EDUCATION"]
        );
    }

    #[test]
    fn test_huge_heading_banner_is_bounded() {
        let text = format!("Jane\n**{}**\nbody", "a".repeat(12_000));
        let doc = layout(&text);
        let banners = runs_with_face(&doc, FontFace::Bold, 11.0);
        assert_eq!(banners.len(), 1);
        assert!(banners[0].chars().count() <= MAX_LINE_CHARS + ELLIPSIS.len());
        assert!(banners[0].ends_with("..."));
    }

    #[test]
    fn test_layout_is_deterministic() {
        assert_eq!(layout(SAMPLE_CV), layout(SAMPLE_CV));
    }
}
