use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Section that holds the candidate name and contact lines.
pub const HEADER_SECTION: &str = "header";

/// Fixed vocabulary every `ParsedDocument` is guaranteed to contain.
/// Order matters: canonicalization walks it front to back and the first
/// vocabulary key to claim a discovered heading wins.
pub const CANONICAL_SECTIONS: [&str; 6] = [
    HEADER_SECTION,
    "profile",
    "experience",
    "education",
    "skills",
    "languages",
];

/// Insertion-ordered mapping from section key to section body.
///
/// Bodies keep their internal newlines. After `parse_sections` every key of
/// `CANONICAL_SECTIONS` is present, possibly with an empty body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedDocument {
    sections: IndexMap<String, String>,
}

impl ParsedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body of `key`, or `""` when the section is absent.
    pub fn get(&self, key: &str) -> &str {
        self.sections.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sections.contains_key(key)
    }

    /// Inserts or replaces a section. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, body: impl Into<String>) {
        self.sections.insert(key.into(), body.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections with a non-blank body, in document order.
    pub fn non_empty(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(_, body)| !body.trim().is_empty())
    }
}

impl FromIterator<(String, String)> for ParsedDocument {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}
