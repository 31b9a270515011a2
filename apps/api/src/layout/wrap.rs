//! Greedy word wrap over the static metric tables.
//!
//! Words wider than the line are broken between characters, so every returned
//! line measures at most `max_width_mm` (a lone glyph wider than the line is
//! the only exception).

use crate::layout::font_metrics::FontMetricTable;

/// Wraps `text` into lines no wider than `max_width_mm`.
///
/// Whitespace runs collapse to single spaces. Empty input yields one empty
/// line so that callers still advance by one line height.
pub fn wrap_text(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_mm: f32,
) -> Vec<String> {
    let space_w = metrics.width_mm(" ", size_pt);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        for piece in split_oversized(word, metrics, size_pt, max_width_mm) {
            let piece_w = metrics.width_mm(&piece, size_pt);
            if current.is_empty() {
                current = piece;
                current_width = piece_w;
            } else if current_width + space_w + piece_w > max_width_mm {
                lines.push(std::mem::take(&mut current));
                current = piece;
                current_width = piece_w;
            } else {
                current.push(' ');
                current.push_str(&piece);
                current_width += space_w + piece_w;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

const ELLIPSIS: &str = "...";

/// Shortens `text` with a trailing "..." until it fits on one line.
///
/// Single pass: the cut is the longest prefix whose running width plus the
/// ellipsis still fits.
pub fn fit_to_width(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_mm: f32,
) -> String {
    if metrics.width_mm(text, size_pt) <= max_width_mm {
        return text.to_string();
    }
    let ellipsis_w = metrics.width_mm(ELLIPSIS, size_pt);
    let mut prefix_w = 0.0_f32;
    let mut cut = None;
    let mut buf = [0u8; 4];
    for (idx, ch) in text.char_indices() {
        if prefix_w + ellipsis_w > max_width_mm {
            break;
        }
        cut = Some(idx);
        prefix_w += metrics.width_mm(ch.encode_utf8(&mut buf), size_pt);
    }
    match cut {
        Some(idx) => format!("{}{ELLIPSIS}", &text[..idx]),
        None => String::new(),
    }
}

fn split_oversized(
    word: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_mm: f32,
) -> Vec<String> {
    if metrics.width_mm(word, size_pt) <= max_width_mm {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0.0_f32;
    let mut buf = [0u8; 4];
    for ch in word.chars() {
        let ch_w = metrics.width_mm(ch.encode_utf8(&mut buf), size_pt);
        if !piece.is_empty() && piece_width + ch_w > max_width_mm {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0.0;
        }
        piece.push(ch);
        piece_width += ch_w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
