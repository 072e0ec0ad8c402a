//! Folding per-abstract LLM extractions into corpus-level tables.

use std::collections::HashMap;

use serde::Serialize;

use repurpose_common::ranking::rank_by_count;
use repurpose_llm::{LlmExtraction, RepurposingPotential};

/// Occurrence counts keyed by name, remembering first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence. Blank names are ignored.
    pub fn add(&mut self, name: &str) {
        if name.trim().is_empty() {
            return;
        }
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descending by count; ties keep first-occurrence order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        rank_by_count(self.entries.iter().map(|(n, c)| (n.as_str(), *c)).collect())
    }

    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighPotentialFinding {
    pub pmid: String,
    pub drugs: Vec<String>,
    pub finding: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateReport {
    pub drugs: FrequencyTable,
    pub mechanisms: FrequencyTable,
    /// In corpus order.
    pub high_potential: Vec<HighPotentialFinding>,
    /// Extractions that produced findings, degraded ones included.
    pub analysed: usize,
    pub degraded: usize,
    pub failed: usize,
}

/// Merge all successful extractions. Error records only count as failures.
pub fn aggregate(extractions: &[LlmExtraction]) -> AggregateReport {
    let mut report = AggregateReport::default();

    for extraction in extractions {
        let Some(findings) = extraction.findings() else {
            report.failed += 1;
            continue;
        };
        report.analysed += 1;
        if findings.degraded {
            report.degraded += 1;
        }

        for drug in &findings.drug_candidates {
            report.drugs.add(drug);
        }
        for mechanism in &findings.mechanisms {
            report.mechanisms.add(mechanism);
        }

        if findings.repurposing_potential == RepurposingPotential::High {
            report.high_potential.push(HighPotentialFinding {
                pmid: findings.pmid.clone(),
                drugs: findings.drug_candidates.clone(),
                finding: findings.key_finding.clone(),
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use repurpose_llm::extraction::parse_response;
    use repurpose_llm::ExtractionOutcome;

    fn ok(id: &str, json: &str) -> LlmExtraction {
        LlmExtraction {
            id: id.to_string(),
            outcome: ExtractionOutcome::Findings(parse_response(id, json)),
        }
    }

    fn failed(id: &str) -> LlmExtraction {
        LlmExtraction {
            id: id.to_string(),
            outcome: ExtractionOutcome::Failed { error: "HTTP 500".to_string() },
        }
    }

    #[test]
    fn test_frequency_table_ties_keep_first_occurrence() {
        let mut t = FrequencyTable::new();
        for name in ["exenatide", "ambroxol", "", "ambroxol", "exenatide", "nilotinib", "  "] {
            t.add(name);
        }
        assert_eq!(t.ranked(), vec![("exenatide", 2), ("ambroxol", 2), ("nilotinib", 1)]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.top(1), vec![("exenatide", 2)]);
    }

    #[test]
    fn test_aggregate_counts_per_occurrence_and_skips_errors() {
        let extractions = vec![
            ok("1", r#"{"drug_candidates":["Ambroxol"],"mechanisms":["GCase activation"],"repurposing_potential":"high","key_finding":"Raises GCase"}"#),
            failed("2"),
            ok("3", r#"{"drug_candidates":["Ambroxol","Exenatide"],"mechanisms":["GLP-1 agonism",""],"repurposing_potential":"medium"}"#),
            ok("4", "no json here"),
        ];

        let report = aggregate(&extractions);
        assert_eq!(report.analysed, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.degraded, 1);
        assert_eq!(report.drugs.ranked(), vec![("Ambroxol", 2), ("Exenatide", 1)]);
        assert_eq!(report.mechanisms.len(), 2);
        assert_eq!(report.high_potential, vec![HighPotentialFinding {
            pmid: "1".to_string(),
            drugs: vec!["Ambroxol".to_string()],
            finding: "Raises GCase".to_string(),
        }]);
    }

    #[test]
    fn test_aggregate_empty() {
        let report = aggregate(&[]);
        assert!(report.drugs.is_empty());
        assert_eq!(report.failed, 0);
    }
}
