//! PDF serialization of a `PageDocument` with `pdf-writer`.
//!
//! Text uses the standard Type1 Helvetica faces with WinAnsiEncoding, so no
//! font program is embedded. Characters outside WinAnsi are written as `?`.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::layout::document::{Element, FilledRect, PageDocument, TextRun};
use crate::layout::font_metrics::{FontFace, PageConfig, MM_PER_PT};

const PRODUCER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Sequential object-id allocator.
struct RefAlloc(i32);

impl RefAlloc {
    fn bump(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

/// Serializes the laid-out document into a complete PDF file.
pub fn write_pdf(document: &PageDocument, config: &PageConfig) -> Vec<u8> {
    let mut alloc = RefAlloc(0);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let info_id = alloc.bump();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);

    let fonts: Vec<(FontFace, Ref)> = FontFace::ALL
        .iter()
        .map(|&face| {
            let font_id = alloc.bump();
            pdf.type1_font(font_id)
                .base_font(Name(face.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (face, font_id)
        })
        .collect();

    let page_width_pt = config.page_width_mm / MM_PER_PT;
    let page_height_pt = config.page_height_mm / MM_PER_PT;
    let mut page_ids = Vec::with_capacity(document.pages.len());

    for page in &document.pages {
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        page_ids.push(page_id);

        let mut content = Content::new();
        for element in &page.elements {
            match element {
                Element::Fill(rect) => draw_fill(&mut content, rect, config),
                Element::Text(run) => draw_text(&mut content, run, config),
            }
        }
        pdf.stream(content_id, &content.finish());

        let mut pdf_page = pdf.page(page_id);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, page_width_pt, page_height_pt))
            .parent(page_tree_id)
            .contents(content_id);
        {
            let mut resources = pdf_page.resources();
            let mut font_dict = resources.fonts();
            for (face, font_id) in &fonts {
                font_dict.pair(Name(face.resource_name().as_bytes()), *font_id);
            }
        }
        pdf_page.finish();
    }

    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    let mut info = pdf.document_info(info_id);
    if let Some(title) = &document.title {
        info.title(TextStr(title));
    }
    info.producer(TextStr(PRODUCER));
    info.finish();

    pdf.finish()
}

fn draw_fill(content: &mut Content, rect: &FilledRect, config: &PageConfig) {
    let (r, g, b) = rect.color.to_unit();
    let bottom_mm = config.page_height_mm - rect.y_mm - rect.height_mm;
    content.set_fill_rgb(r, g, b);
    content.rect(
        rect.x_mm / MM_PER_PT,
        bottom_mm / MM_PER_PT,
        rect.width_mm / MM_PER_PT,
        rect.height_mm / MM_PER_PT,
    );
    content.fill_nonzero();
}

fn draw_text(content: &mut Content, run: &TextRun, config: &PageConfig) {
    let (r, g, b) = run.color.to_unit();
    let encoded = encode_win_ansi(&run.text);
    content.set_fill_rgb(r, g, b);
    content.begin_text();
    content.set_font(Name(run.face.resource_name().as_bytes()), run.size_pt);
    content.next_line(
        run.x_mm / MM_PER_PT,
        (config.page_height_mm - run.baseline_mm) / MM_PER_PT,
    );
    content.show(Str(&encoded));
    content.end_text();
}

/// Encodes text for a WinAnsiEncoding simple font.
///
/// Latin-1 code points map to themselves; the 0x80–0x9F block uses the
/// Windows-1252 assignments. Anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\t' => b' ',
            ' '..='~' => ch as u8,
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::document::{Color, Page};
    use crate::layout::font_metrics::{default_page_config, PaperSize};

    fn one_page(elements: Vec<Element>) -> PageDocument {
        PageDocument {
            title: Some("Jane Doe".to_string()),
            pages: vec![Page {
                number: 1,
                elements,
            }],
        }
    }

    #[test]
    fn test_output_is_a_complete_pdf() {
        let config = default_page_config(PaperSize::A4);
        let bytes = write_pdf(&one_page(vec![]), &config);
        assert!(bytes.starts_with(b"%PDF-"));
        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(16)..]).to_string();
        assert!(tail.contains("%%EOF"), "missing trailer: {tail}");
    }

    #[test]
    fn test_standard_fonts_are_referenced() {
        let config = default_page_config(PaperSize::A4);
        let bytes = write_pdf(&one_page(vec![]), &config);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Helvetica-Bold"));
        assert!(text.contains("/Helvetica-Oblique"));
        assert!(text.contains("/WinAnsiEncoding"));
    }

    #[test]
    fn test_text_and_fill_are_emitted() {
        let config = default_page_config(PaperSize::A4);
        let doc = one_page(vec![
            Element::Fill(FilledRect {
                x_mm: 10.0,
                y_mm: 10.0,
                width_mm: 190.0,
                height_mm: 7.0,
                color: Color::rgb(0, 102, 204),
            }),
            Element::Text(TextRun {
                text: "EXPERIENCE".to_string(),
                x_mm: 11.0,
                baseline_mm: 15.0,
                width_mm: 30.0,
                face: FontFace::Bold,
                size_pt: 11.0,
                color: Color::WHITE,
            }),
        ]);
        let bytes = write_pdf(&doc, &config);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("EXPERIENCE"));
        assert!(text.contains("/F2"));
    }

    #[test]
    fn test_page_count_grows_output() {
        let config = default_page_config(PaperSize::A4);
        let single = write_pdf(&one_page(vec![]), &config);
        let mut doc = one_page(vec![]);
        doc.pages.push(Page::new(2));
        let double = write_pdf(&doc, &config);
        assert!(double.len() > single.len());
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Rust"), b"Rust".to_vec());
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("•"), vec![0x95]);
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
    }
}
