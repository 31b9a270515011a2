//! Paragraph blocks and render items: the body-level structure of a section.
//!
//! A section body splits into blocks on runs of blank lines. Within a block the
//! first line becomes a sub-heading unless it starts with a bullet marker; the
//! remaining lines are bullets or plain lines. Every item line longer than
//! `MAX_LINE_CHARS` characters is cut and marked with `ELLIPSIS`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static BLANK_LINE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid blank-line regex"));

/// Bullet markers recognised at the start of a body line.
pub const BULLET_MARKERS: [char; 2] = ['-', '•'];

/// Hard cap on characters per item line.
pub const MAX_LINE_CHARS: usize = 120;
pub const ELLIPSIS: &str = "...";

/// One renderable unit of section body content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderItem {
    /// First line of a block that does not start with a bullet marker.
    Title { text: String },
    /// Line prefixed with `-` or `•`; `text` has the marker and leading space removed.
    Bullet { marker: char, text: String },
    Plain { text: String },
}

impl RenderItem {
    pub fn text(&self) -> &str {
        match self {
            RenderItem::Title { text }
            | RenderItem::Bullet { text, .. }
            | RenderItem::Plain { text } => text,
        }
    }
}

/// Splits a section body into blocks of items. Blank blocks are skipped.
pub fn paragraph_blocks(body: &str) -> Vec<Vec<RenderItem>> {
    BLANK_LINE_RUN
        .split(body)
        .filter(|block| !block.trim().is_empty())
        .map(block_items)
        .collect()
}

fn block_items(block: &str) -> Vec<RenderItem> {
    let mut lines = block.split('\n').map(str::trim).peekable();
    let mut items = Vec::new();

    if let Some(first) = lines.peek() {
        if !starts_with_bullet(first) {
            items.push(RenderItem::Title {
                text: truncate_line(first),
            });
            lines.next();
        }
    }

    items.extend(lines.filter(|line| !line.is_empty()).map(classify_line));
    items
}

fn classify_line(line: &str) -> RenderItem {
    let line = truncate_line(line);
    let mut chars = line.chars();
    match chars.next() {
        Some(marker) if BULLET_MARKERS.contains(&marker) => RenderItem::Bullet {
            marker,
            text: chars.as_str().trim().to_string(),
        },
        _ => RenderItem::Plain { text: line },
    }
}

fn starts_with_bullet(line: &str) -> bool {
    line.starts_with(BULLET_MARKERS)
}

/// Cuts `line` to `MAX_LINE_CHARS` characters plus an ellipsis when it is longer.
pub fn truncate_line(line: &str) -> String {
    match line.char_indices().nth(MAX_LINE_CHARS) {
        Some((cut, _)) => format!("{}{}", &line[..cut], ELLIPSIS),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet(text: &str) -> RenderItem {
        RenderItem::Bullet {
            marker: '-',
            text: text.to_string(),
        }
    }

    #[test]
    fn test_block_starting_with_bullet_has_no_title() {
        let blocks = paragraph_blocks("- Rust\n- Go");
        assert_eq!(blocks, vec![vec![bullet("Rust"), bullet("Go")]]);
    }

    #[test]
    fn test_block_title_extracted_before_bullets() {
        let blocks = paragraph_blocks("Software Engineer, Acme Corp\n- Built X\n- Shipped Y");
        assert_eq!(
            blocks,
            vec![vec![
                RenderItem::Title {
                    text: "Software Engineer, Acme Corp".to_string()
                },
                bullet("Built X"),
                bullet("Shipped Y"),
            ]]
        );
    }

    #[test]
    fn test_blank_line_runs_separate_blocks() {
        let blocks = paragraph_blocks("Acme\n- a\n\n  \n\nInitech\nplain line");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[1],
            vec![
                RenderItem::Title {
                    text: "Initech".to_string()
                },
                RenderItem::Plain {
                    text: "plain line".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_round_bullet_marker() {
        let blocks = paragraph_blocks("• Led a team of 4");
        assert_eq!(
            blocks,
            vec![vec![RenderItem::Bullet {
                marker: '•',
                text: "Led a team of 4".to_string()
            }]]
        );
    }

    #[test]
    fn test_empty_body_has_no_blocks() {
        assert!(paragraph_blocks("").is_empty());
        assert!(paragraph_blocks("\n\n   \n").is_empty());
    }

    #[test]
    fn test_long_line_truncated_to_120_plus_ellipsis() {
        let long = "x".repeat(200);
        let blocks = paragraph_blocks(&format!("- {long}"));
        // The marker counts towards the limit: "- " + 118 x's.
        let text = blocks[0][0].text();
        assert_eq!(text, format!("{}{}", "x".repeat(118), ELLIPSIS));
    }

    #[test]
    fn test_long_title_truncated() {
        let long = "y".repeat(200);
        let blocks = paragraph_blocks(&long);
        let text = blocks[0][0].text();
        assert_eq!(text.chars().count(), MAX_LINE_CHARS + ELLIPSIS.len());
        assert!(text.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let accented = "é".repeat(130);
        let cut = truncate_line(&accented);
        assert_eq!(cut.chars().count(), 123);
        assert_eq!(truncate_line("short"), "short");
        assert_eq!(truncate_line(&"a".repeat(120)), "a".repeat(120));
    }
}
