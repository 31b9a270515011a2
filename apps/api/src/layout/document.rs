//! Positioned output of the layout stage, independent of the PDF encoding.
//!
//! Coordinates are millimetres measured from the top-left corner of the page.

use crate::layout::font_metrics::FontFace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to 0.0–1.0.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

/// A single line of text placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x_mm: f32,
    pub baseline_mm: f32,
    /// Measured advance width of `text`.
    pub width_mm: f32,
    pub face: FontFace,
    pub size_pt: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilledRect {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Fill(FilledRect),
    Text(TextRun),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            elements: Vec::new(),
        }
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text(run) => Some(run),
            Element::Fill(_) => None,
        })
    }

    pub fn fills(&self) -> impl Iterator<Item = &FilledRect> {
        self.elements.iter().filter_map(|element| match element {
            Element::Fill(rect) => Some(rect),
            Element::Text(_) => None,
        })
    }
}

/// The laid-out CV: fixed-size pages, each with positioned runs and a footer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    /// Candidate name, used as the PDF title when present.
    pub title: Option<String>,
    pub pages: Vec<Page>,
}

impl PageDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(Page::text_runs)
    }
}
