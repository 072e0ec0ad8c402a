//! Repurposing candidates from title-like lines.
//!
//! PubMed's plain-text abstract format puts the article title on its own
//! line. The first line that mentions a cue word and has a title-like length
//! is taken as the title; capitalised one- or two-word runs inside it are
//! reported as drug-name candidates. This is a crude heuristic: author and
//! disease names come through as well, lower-case drug names do not.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use repurpose_common::{records::truncate_chars, AbstractRecord};

/// Cue words, matched case-insensitively anywhere in the line.
const CUE_WORDS: &[&str] = &["potential", "drug", "against", "treatment"];

/// Exclusive bounds on the length (in characters) of a title line.
pub const MIN_TITLE_CHARS: usize = 20;
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum length of the reported title snippet.
pub const SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRecord {
    pub id: String,
    pub title_snippet: String,
    pub drug_name_tokens: BTreeSet<String>,
}

impl CandidateRecord {
    /// Tokens joined for the `Potential_Drugs` CSV column.
    pub fn joined_tokens(&self) -> String {
        self.drug_name_tokens.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn drug_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // One capitalised word, optionally followed by a second one
        Regex::new(r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?").unwrap()
    })
}

/// First line with a cue word and a length strictly inside the title bounds,
/// trimmed of surrounding whitespace.
pub fn find_title_line(text: &str) -> Option<&str> {
    text.split('\n')
        .find(|line| {
            let lowered = line.to_lowercase();
            let has_cue = CUE_WORDS.iter().any(|cue| lowered.contains(cue));
            let len = line.chars().count();
            has_cue && len > MIN_TITLE_CHARS && len < MAX_TITLE_CHARS
        })
        .map(str::trim)
}

/// Capitalised one- or two-word runs in `line`.
pub fn drug_name_tokens(line: &str) -> BTreeSet<String> {
    drug_name_regex()
        .find_iter(line)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn extract_candidate(record: &AbstractRecord) -> Option<CandidateRecord> {
    let title = find_title_line(&record.text)?;
    Some(CandidateRecord {
        id: record.id.clone(),
        title_snippet: truncate_chars(title, SNIPPET_CHARS).to_string(),
        drug_name_tokens: drug_name_tokens(title),
    })
}

/// Candidate records for every abstract that has a qualifying title line.
/// Abstracts without one are skipped.
pub fn extract_candidates(records: &[AbstractRecord]) -> Vec<CandidateRecord> {
    records.iter().filter_map(extract_candidate).collect()
}
