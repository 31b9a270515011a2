//! Section Parser: turns free-form CV text into a `ParsedDocument`.
//!
//! # Pipeline
//! 1. Fold over trimmed, non-blank lines carrying `(active section, sections)`.
//! 2. Join each section's lines with `\n`.
//! 3. Header backfill: an empty header takes the first 5 lines of the first
//!    non-empty section.
//! 4. Drop blank sections.
//! 5. Canonicalize into a fresh map (the discovered map is never mutated),
//!    then back-fill missing vocabulary keys with empty bodies.

use indexmap::IndexMap;
use tracing::debug;

use crate::sections::headings::detect_heading;
use crate::sections::models::{ParsedDocument, CANONICAL_SECTIONS, HEADER_SECTION};

/// Number of lines moved into `header` when no header was detected.
const HEADER_BACKFILL_LINES: usize = 5;

/// Parses raw CV text. Never fails; every canonical key is present in the result.
pub fn parse_sections(text: &str) -> ParsedDocument {
    let discovered = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .fold(SectionAccumulator::new(), SectionAccumulator::push)
        .finish();

    let discovered = backfill_header(discovered);
    let discovered: Vec<(String, String)> = discovered
        .into_iter()
        .filter(|(_, body)| !body.trim().is_empty())
        .collect();

    let parsed = canonicalize(discovered);
    debug!(
        sections = parsed.len(),
        non_empty = parsed.non_empty().count(),
        "Parsed CV sections"
    );
    parsed
}

// ────────────────────────────────────────────────────────────────────────────
// Accumulation
// ────────────────────────────────────────────────────────────────────────────

/// Fold state: the active section and the lines gathered per section so far.
struct SectionAccumulator {
    active: String,
    sections: IndexMap<String, Vec<String>>,
}

impl SectionAccumulator {
    fn new() -> Self {
        let mut sections = IndexMap::new();
        sections.insert(HEADER_SECTION.to_string(), Vec::new());
        Self {
            active: HEADER_SECTION.to_string(),
            sections,
        }
    }

    fn push(mut self, line: &str) -> Self {
        match detect_heading(line) {
            Some(heading) => {
                self.sections.entry(heading.name.clone()).or_default();
                self.active = heading.name;
            }
            None => {
                self.sections
                    .entry(self.active.clone())
                    .or_default()
                    .push(line.to_string());
            }
        }
        self
    }

    fn finish(self) -> Vec<(String, String)> {
        self.sections
            .into_iter()
            .map(|(key, lines)| (key, lines.join("\n")))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Header backfill
// ────────────────────────────────────────────────────────────────────────────

fn backfill_header(mut sections: Vec<(String, String)>) -> Vec<(String, String)> {
    let header_is_empty = sections
        .iter()
        .find(|(key, _)| key == HEADER_SECTION)
        .map_or(true, |(_, body)| body.trim().is_empty());
    if !header_is_empty {
        return sections;
    }

    let Some(donor) = sections.iter().position(|(_, body)| !body.trim().is_empty()) else {
        return sections;
    };

    let donor_lines: Vec<&str> = sections[donor].1.split('\n').collect();
    let split_at = donor_lines.len().min(HEADER_BACKFILL_LINES);
    let header_body = donor_lines[..split_at].join("\n");
    let remainder = donor_lines[split_at..].join("\n");
    debug!(
        donor = %sections[donor].0,
        lines = split_at,
        "No header detected; backfilling from first non-empty section"
    );

    sections[donor].1 = remainder;
    match sections.iter_mut().find(|(key, _)| key == HEADER_SECTION) {
        Some((_, body)) => *body = header_body,
        None => sections.insert(0, (HEADER_SECTION.to_string(), header_body)),
    }
    sections
}

// ────────────────────────────────────────────────────────────────────────────
// Canonicalization
// ────────────────────────────────────────────────────────────────────────────

/// Two-pass canonicalization.
///
/// Pass one walks the vocabulary in order; each vocabulary key claims the first
/// unclaimed discovered key that contains it or is contained by it. Pass two
/// copies entries into a new map under their resolved names, keeping encounter
/// order. A claimed entry beats an unclaimed one of the same spelling.
fn canonicalize(discovered: Vec<(String, String)>) -> ParsedDocument {
    let mut claimed: Vec<Option<&'static str>> = vec![None; discovered.len()];

    for canonical in CANONICAL_SECTIONS {
        let candidate = discovered.iter().enumerate().position(|(idx, (key, _))| {
            claimed[idx].is_none() && (key.contains(canonical) || canonical.contains(key.as_str()))
        });
        if let Some(idx) = candidate {
            if discovered[idx].0 != canonical {
                debug!(from = %discovered[idx].0, to = canonical, "Canonicalized section key");
            }
            claimed[idx] = Some(canonical);
        }
    }

    let mut resolved: IndexMap<String, (String, bool)> = IndexMap::new();
    for ((key, body), claim) in discovered.into_iter().zip(claimed) {
        let is_claimed = claim.is_some();
        let name = claim.map(str::to_string).unwrap_or(key);
        match resolved.get_mut(&name) {
            Some(existing) if existing.1 && !is_claimed => {}
            Some(existing) => *existing = (body, is_claimed),
            None => {
                resolved.insert(name, (body, is_claimed));
            }
        }
    }

    let mut parsed: ParsedDocument = resolved
        .into_iter()
        .map(|(key, (body, _))| (key, body))
        .collect();
    for canonical in CANONICAL_SECTIONS {
        if !parsed.contains(canonical) {
            parsed.insert(canonical, "");
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CV: &str = "\
Jane Doe
jane@example.com
+33 6 12 34 56 78

**Profile**
Backend engineer with a taste for compilers.

**Experience**
Software Engineer, Acme Corp
- Built a Rust ingestion pipeline
- Cut p99 latency by 40%

Intern, Initech
- Wrote TPS reports

**Education**
MSc Computer Science, Sorbonne

SKILLS
Rust, Go, SQL

--- Languages ---
French, English
";

    fn keys(doc: &ParsedDocument) -> Vec<&str> {
        doc.keys().collect()
    }

    #[test]
    fn test_all_canonical_keys_present_for_any_input() {
        for input in ["", "   \n\n  ", "just one line", SAMPLE_CV, "****\n---\n**"] {
            let doc = parse_sections(input);
            for key in CANONICAL_SECTIONS {
                assert!(doc.contains(key), "missing {key} for input {input:?}");
            }
        }
    }

    #[test]
    fn test_sample_cv_sections() {
        let doc = parse_sections(SAMPLE_CV);
        assert_eq!(
            keys(&doc),
            vec!["header", "profile", "experience", "education", "skills", "languages"]
        );
        assert_eq!(doc.get("header"), "Jane Doe\njane@example.com\n+33 6 12 34 56 78");
        assert_eq!(doc.get("skills"), "Rust, Go, SQL");
        assert_eq!(doc.get("languages"), "French, English");
    }

    #[test]
    fn test_blank_lines_are_dropped_from_bodies() {
        let doc = parse_sections(SAMPLE_CV);
        assert_eq!(
            doc.get("experience"),
            "Software Engineer, Acme Corp\n- Built a Rust ingestion pipeline\n\
             - Cut p99 latency by 40%\nIntern, Initech\n- Wrote TPS reports"
        );
    }

    #[test]
    fn test_two_bold_sections_no_cross_contamination() {
        let text = "Jane Doe\n**Experience**\nEngineer at Acme\n- Shipped things\n\n**Education**\nBSc Physics\nMIT";
        let doc = parse_sections(text);
        assert_eq!(doc.get("experience"), "Engineer at Acme\n- Shipped things");
        assert_eq!(doc.get("education"), "BSc Physics\nMIT");
        assert_eq!(doc.get("header"), "Jane Doe");
    }

    #[test]
    fn test_mixed_case_line_stays_in_active_section() {
        let text = "Jane Doe\n**Experience**\nEngineer\nSkills\nRust";
        let doc = parse_sections(text);
        assert_eq!(doc.get("experience"), "Engineer\nSkills\nRust");
        assert_eq!(doc.get("skills"), "");
    }

    #[test]
    fn test_shout_case_line_opens_section() {
        let text = "Jane Doe\nSKILLS\nRust";
        let doc = parse_sections(text);
        assert_eq!(doc.get("skills"), "Rust");
        assert_eq!(doc.get("header"), "Jane Doe");
    }

    #[test]
    fn test_header_backfill_takes_first_five_lines() {
        let text = "**Experience**\nl1\nl2\nl3\nl4\nl5\nl6\nl7";
        let doc = parse_sections(text);
        assert_eq!(doc.get("header"), "l1\nl2\nl3\nl4\nl5");
        assert_eq!(doc.get("experience"), "l6\nl7");
    }

    #[test]
    fn test_header_backfill_empties_short_donor() {
        let text = "**Experience**\nl1\nl2";
        let doc = parse_sections(text);
        assert_eq!(doc.get("header"), "l1\nl2");
        // Donor is dropped, then re-added as an empty placeholder at the end.
        assert_eq!(doc.get("experience"), "");
        assert_eq!(
            keys(&doc),
            vec!["header", "profile", "experience", "education", "skills", "languages"]
        );
    }

    #[test]
    fn test_all_caps_name_is_a_heading() {
        // Accepted false positive: an all-caps name opens its own section,
        // which the header backfill then drains.
        let text = "JANE DOE\njane@example.com\n**Skills**\nRust";
        let doc = parse_sections(text);
        assert!(!doc.contains("jane doe"));
        assert_eq!(doc.get("header"), "jane@example.com");
        assert_eq!(doc.get("skills"), "Rust");
    }

    #[test]
    fn test_variant_headings_fold_into_canonical_keys() {
        let text = "Jane\n**Professional Experience**\nAcme\n**Technical Skills**\nRust\n**Languages spoken**\nFrench";
        let doc = parse_sections(text);
        assert_eq!(doc.get("experience"), "Acme");
        assert_eq!(doc.get("skills"), "Rust");
        assert_eq!(doc.get("languages"), "French");
        assert!(!doc.contains("professional experience"));
        assert_eq!(
            keys(&doc),
            vec!["header", "experience", "skills", "languages", "profile", "education"]
        );
    }

    #[test]
    fn test_contained_by_match_folds_short_key() {
        let text = "Jane\n**Skill**\nRust";
        let doc = parse_sections(text);
        assert_eq!(doc.get("skills"), "Rust");
        assert!(!doc.contains("skill"));
    }

    #[test]
    fn test_ambiguous_heading_first_vocabulary_match_wins() {
        let text = "Jane\n**Languages and Skills**\nRust, French";
        let doc = parse_sections(text);
        assert_eq!(doc.get("skills"), "Rust, French");
        assert_eq!(doc.get("languages"), "");
    }

    #[test]
    fn test_claimed_variant_beats_exact_duplicate() {
        let text = "Jane\n**Work Experience**\nAcme\n**Experience**\nInitech";
        let doc = parse_sections(text);
        assert_eq!(doc.get("experience"), "Acme");
        assert_eq!(doc.get("work experience"), "");
        assert!(!doc.contains("work experience"));
    }

    #[test]
    fn test_unknown_sections_are_kept_in_order() {
        let text = "Jane\n**Projects**\nCompiler\n**Certifications**\nAWS";
        let doc = parse_sections(text);
        assert_eq!(&keys(&doc)[..3], &["header", "projects", "certifications"]);
        assert_eq!(doc.get("projects"), "Compiler");
    }

    #[test]
    fn test_reparse_of_bodies_is_stable() {
        let doc = parse_sections(SAMPLE_CV);
        let rebuilt: String = doc
            .non_empty()
            .map(|(key, body)| {
                if key == "header" {
                    format!("{body}\n")
                } else {
                    format!("**{key}**\n{body}\n")
                }
            })
            .collect();
        let reparsed = parse_sections(&rebuilt);
        let before: Vec<&str> = doc.non_empty().map(|(k, _)| k).collect();
        let after: Vec<&str> = reparsed.non_empty().map(|(k, _)| k).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_windows_line_endings() {
        let doc = parse_sections("Jane\r\n**Skills**\r\nRust\r\n");
        assert_eq!(doc.get("header"), "Jane");
        assert_eq!(doc.get("skills"), "Rust");
    }
}
