//! Layout cursor: the paginator.
//!
//! Tracks the vertical offset on the current page and opens a new page when the
//! next line would cross `PageConfig::break_threshold_mm`. Content starts at the
//! top margin on every page.

use tracing::trace;

use crate::layout::document::{Element, Page};
use crate::layout::font_metrics::PageConfig;

pub struct LayoutCursor<'a> {
    config: &'a PageConfig,
    pages: Vec<Page>,
    y_mm: f32,
}

impl<'a> LayoutCursor<'a> {
    pub fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: vec![Page::new(1)],
            y_mm: config.margin_mm,
        }
    }

    pub fn config(&self) -> &PageConfig {
        self.config
    }

    /// Current vertical offset from the top edge.
    pub fn y(&self) -> f32 {
        self.y_mm
    }

    pub fn page_number(&self) -> usize {
        self.pages.len()
    }

    /// Breaks to a new page unless `height_mm` still fits above the footer reserve.
    ///
    /// A block taller than a whole page is placed at the top of a fresh page and
    /// allowed to run into the reserve rather than breaking forever.
    pub fn ensure(&mut self, height_mm: f32) {
        let at_top = self.y_mm <= self.config.margin_mm;
        if self.y_mm + height_mm > self.config.break_threshold_mm() && !at_top {
            self.break_page();
        }
    }

    pub fn break_page(&mut self) {
        let number = self.pages.len() + 1;
        trace!(page = number, "Page break");
        self.pages.push(Page::new(number));
        self.y_mm = self.config.margin_mm;
    }

    /// Moves down without a break check; the next `ensure` handles overflow.
    pub fn advance(&mut self, height_mm: f32) {
        self.y_mm += height_mm;
    }

    pub fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
