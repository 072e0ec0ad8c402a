//! Corpus record shared by every extractor.

use serde::{Deserialize, Serialize};

/// One abstract in the corpus, keyed by its PubMed identifier.
///
/// Serialised with the `PMID` / `Abstract` column names used by the corpus
/// export CSV, so the same type round-trips through the flat file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractRecord {
    #[serde(rename = "PMID")]
    pub id: String,
    #[serde(rename = "Abstract", default)]
    pub text: String,
}

impl AbstractRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// Truncate to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
