//! Keyword pipeline report: drug classes, title candidates, mechanisms.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use repurpose_extract::{CandidateRecord, ClassificationResult, MechanismCounts};

const RULE_WIDTH: usize = 80;
/// Candidates shown on the console; the CSV holds all of them.
pub const CONSOLE_CANDIDATES: usize = 10;
/// Classes and mechanisms listed in the narrative summary.
pub const SUMMARY_TOP: usize = 5;
pub const SUMMARY_EXAMPLES: usize = 3;

/// What the corpus was searched for, as shown in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pub disease: String,
    pub focus: String,
    pub date_range: String,
    pub language: String,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            disease: "Parkinson's Disease".to_string(),
            focus: "Drug Repurposing/Repositioning".to_string(),
            date_range: "2020-2025".to_string(),
            language: "English".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordReport {
    pub criteria: SearchCriteria,
    pub total_records: usize,
    pub classification: ClassificationResult,
    pub candidates: Vec<CandidateRecord>,
    pub mechanisms: MechanismCounts,
    pub generated_at: DateTime<Utc>,
}

fn banner(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "\n{rule}\n{title}\n{rule}");
}

impl KeywordReport {
    pub fn new(
        criteria: SearchCriteria,
        total_records: usize,
        classification: ClassificationResult,
        candidates: Vec<CandidateRecord>,
        mechanisms: MechanismCounts,
    ) -> Self {
        Self {
            criteria,
            total_records,
            classification,
            candidates,
            mechanisms,
            generated_at: Utc::now(),
        }
    }

    /// Name of the class with most records, or `none`.
    pub fn most_mentioned_class(&self) -> &str {
        self.classification
            .most_mentioned()
            .map(|h| h.category.as_str())
            .unwrap_or("none")
    }

    pub fn render_console(&self) -> String {
        let mut out = String::new();
        let dash = "-".repeat(RULE_WIDTH);

        banner(&mut out, "METHOD 1: DRUG CLASSES MENTIONED");
        let ranked = self.classification.ranked();
        if ranked.is_empty() {
            let _ = writeln!(out, "No drug classes matched.");
        }
        for hits in ranked {
            let _ = writeln!(out, "\n{}: {} articles", hits.category, hits.ids.len());
            let _ = writeln!(out, "  PMIDs: {}", hits.ids.join(", "));
        }

        banner(&mut out, "METHOD 2: REPURPOSING CANDIDATES FROM TITLES");
        if self.candidates.is_empty() {
            let _ = writeln!(out, "No title-line candidates found.");
        } else {
            let _ = writeln!(out, "\nTop Repurposing Candidates:\n{dash}");
            let _ = writeln!(out, "{:>10}  {:<60}  Potential_Drugs", "PMID", "Title");
            for c in self.candidates.iter().take(CONSOLE_CANDIDATES) {
                let _ = writeln!(out, "{:>10}  {:<60}  {}", c.id, c.title_snippet, c.joined_tokens());
            }
        }

        banner(&mut out, "METHOD 3: COMMON MECHANISMS MENTIONED");
        let _ = writeln!(out, "\nMechanisms of Action Frequency:\n{dash}");
        for (term, count) in self.mechanisms.ranked() {
            let pct = self.mechanisms.percentage(term).unwrap_or(0.0);
            let _ = writeln!(out, "{term:20}: {count:3} ({pct:5.1}%)");
        }

        banner(&mut out, "SUMMARY");
        let _ = writeln!(out, "\nTotal Abstracts Analyzed: {}", self.total_records);
        let _ = writeln!(out, "Drug Classes Found: {}", self.classification.matched_categories());
        let _ = writeln!(out, "Potential Repurposing Candidates Identified: {}", self.candidates.len());
        let _ = writeln!(out, "\nMost Mentioned Drug Class: {}", self.most_mentioned_class());

        out
    }

    /// Narrative written to `analysis_summary.txt`.
    pub fn render_summary(&self) -> String {
        let c = &self.criteria;
        let classes = self.classification.matched_categories();
        let mut out = String::new();

        let _ = writeln!(out, "{} DRUG REPURPOSING ANALYSIS", c.disease.to_uppercase());
        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        let _ = writeln!(out, "Generated: {}\n", self.generated_at.format("%Y-%m-%d %H:%M UTC"));

        let _ = writeln!(out, "SEARCH CRITERIA:");
        let _ = writeln!(out, "- Disease: {}", c.disease);
        let _ = writeln!(out, "- Focus: {}", c.focus);
        let _ = writeln!(out, "- Date Range: {}", c.date_range);
        let _ = writeln!(out, "- Language: {}", c.language);
        let _ = writeln!(out, "- Total Articles Found: {}\n", self.total_records);

        let _ = writeln!(out, "KEY FINDINGS:\n");
        let _ = writeln!(out, "1. Drug Classes Identified: {classes}");
        for hits in self.classification.ranked().into_iter().take(SUMMARY_TOP) {
            let _ = writeln!(out, "   - {}: {} articles", hits.category, hits.ids.len());
        }

        let _ = writeln!(out, "\n2. Top Mechanisms:");
        for (term, count) in self.mechanisms.ranked().into_iter().take(SUMMARY_TOP) {
            let pct = self.mechanisms.percentage(term).unwrap_or(0.0);
            let _ = writeln!(out, "   - {term}: {count} ({pct:.1}%)");
        }

        let _ = writeln!(out, "\n3. Repurposing Candidates: {}", self.candidates.len());
        if !self.candidates.is_empty() {
            let _ = writeln!(out, "   Examples:");
            for cand in self.candidates.iter().take(SUMMARY_EXAMPLES) {
                let _ = writeln!(out, "   - {}", cand.title_snippet);
            }
        }

        let _ = writeln!(out, "\nCONCLUSION:");
        let _ = writeln!(
            out,
            "The analysis identified {classes} different drug classes with potential for\n\
             {} treatment, with {} specific drug candidates mentioned\n\
             in the literature.",
            c.disease,
            self.candidates.len()
        );

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repurpose_extract::{classify, count_mechanisms, default_mechanism_terms, extract_candidates, CategoryVocabulary};
    use repurpose_test_utils::sample_corpus;

    fn sample_report() -> KeywordReport {
        let records = sample_corpus();
        KeywordReport::new(
            SearchCriteria::default(),
            records.len(),
            classify(&records, &CategoryVocabulary::default()),
            extract_candidates(&records),
            count_mechanisms(&records, &default_mechanism_terms()),
        )
    }

    fn empty_report() -> KeywordReport {
        KeywordReport::new(
            SearchCriteria::default(),
            0,
            classify(&[], &CategoryVocabulary::default()),
            Vec::new(),
            count_mechanisms(&[], &default_mechanism_terms()),
        )
    }

    #[test]
    fn test_console_sections_and_mechanism_format() {
        let text = sample_report().render_console();
        assert!(text.contains("METHOD 1: DRUG CLASSES MENTIONED"));
        assert!(text.contains("Statins: 1 articles\n  PMIDs: 38000002"));
        assert!(text.contains("motor               :   2 ( 66.7%)"));
        assert!(!text.contains("cognitive"));
        assert!(text.contains("Total Abstracts Analyzed: 3"));
        assert!(text.contains("Potential Repurposing Candidates Identified: 2"));
    }

    #[test]
    fn test_most_mentioned_falls_back_to_none() {
        let report = empty_report();
        assert_eq!(report.most_mentioned_class(), "none");
        assert!(report.render_console().contains("Most Mentioned Drug Class: none"));
    }

    #[test]
    fn test_most_mentioned_tie_uses_vocabulary_order() {
        // Levodopa, Amantadine, Statins and Beta-blockers all have one record
        assert_eq!(sample_report().most_mentioned_class(), "Levodopa");
    }

    #[test]
    fn test_summary_narrative() {
        let text = sample_report().render_summary();
        assert!(text.starts_with("PARKINSON'S DISEASE DRUG REPURPOSING ANALYSIS"));
        assert!(text.contains("- Date Range: 2020-2025"));
        assert!(text.contains("- Total Articles Found: 3"));
        assert!(text.contains("1. Drug Classes Identified: 4"));
        assert!(text.contains("   - motor: 2 (66.7%)"));
        assert!(text.contains("3. Repurposing Candidates: 2"));
        assert!(text.contains("   - Amantadine as a potential treatment for levodopa-induced dyskinesia."));
        assert!(text.contains("with 2 specific drug candidates"));
    }

    #[test]
    fn test_summary_for_empty_corpus() {
        let text = empty_report().render_summary();
        assert!(text.contains("1. Drug Classes Identified: 0"));
        assert!(!text.contains("Examples:"));
    }
}
