//! Heading detection: decides whether a trimmed CV line opens a new section.
//!
//! Detection is an ordered, append-only table of pure rules. The first rule in
//! `HEADING_RULES` that matches supplies the heading text; afterwards the
//! asterisk-fence rule runs unconditionally and, when it applies, re-derives
//! the text. A rule that yields an empty name never produces a heading.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static BOLD_WRAPPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*{2}([^*]+)\*{2}\s*$").expect("valid bold heading regex"));
static SHOUT_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[A-Z\s]{5,}\s*$").expect("valid shout-case regex"));
static DASHED_RULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*-{3,}\s*([^-]+)\s*-{3,}\s*$").expect("valid dashed heading regex")
});

/// Which rule recognised a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadingKind {
    /// `**Experience**`
    BoldWrapped,
    /// `WORK EXPERIENCE`: five or more ASCII capitals/spaces.
    ShoutCase,
    /// `--- Education ---`
    DashedRule,
    /// Any line that starts and ends with `**`, e.g. `**Skills*and*Tools**`.
    AsteriskFenced,
}

/// A single detection rule: returns the case-folded heading text on match.
pub struct HeadingRule {
    pub kind: HeadingKind,
    pub detect: fn(&str) -> Option<String>,
}

/// Priority-ordered rules; first match wins. New rules go at the end.
pub static HEADING_RULES: &[HeadingRule] = &[
    HeadingRule {
        kind: HeadingKind::BoldWrapped,
        detect: detect_bold_wrapped,
    },
    HeadingRule {
        kind: HeadingKind::ShoutCase,
        detect: detect_shout_case,
    },
    HeadingRule {
        kind: HeadingKind::DashedRule,
        detect: detect_dashed_rule,
    },
];

/// Runs after the table and overrides its result when it matches.
pub static FENCE_OVERRIDE: HeadingRule = HeadingRule {
    kind: HeadingKind::AsteriskFenced,
    detect: detect_asterisk_fenced,
};

/// A detected heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub name: String,
    pub kind: HeadingKind,
}

/// Classifies a trimmed, non-blank line. `None` means body text.
pub fn detect_heading(line: &str) -> Option<Heading> {
    let from_table = HEADING_RULES.iter().find_map(|rule| {
        (rule.detect)(line).map(|name| Heading {
            name,
            kind: rule.kind,
        })
    });

    let heading = match (FENCE_OVERRIDE.detect)(line) {
        Some(name) => Some(Heading {
            name,
            kind: FENCE_OVERRIDE.kind,
        }),
        None => from_table,
    };

    heading.filter(|h| !h.name.is_empty())
}

fn detect_bold_wrapped(line: &str) -> Option<String> {
    BOLD_WRAPPED
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| fold(m.as_str()))
}

fn detect_shout_case(line: &str) -> Option<String> {
    if !SHOUT_CASE.is_match(line) {
        return None;
    }
    Some(fold(line.trim_matches(|c| matches!(c, '*' | ' ' | '-'))))
}

fn detect_dashed_rule(line: &str) -> Option<String> {
    DASHED_RULE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| fold(m.as_str()))
}

fn detect_asterisk_fenced(line: &str) -> Option<String> {
    if line.starts_with("**") && line.ends_with("**") {
        Some(fold(line.trim_matches('*')))
    } else {
        None
    }
}

fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}
