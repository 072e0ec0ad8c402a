//! Mechanism term presence counts.

use serde::Serialize;

use repurpose_common::{
    ranking::{percentage, rank_by_count},
    AbstractRecord,
};

/// Per-term count of records mentioning the term at least once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MechanismCounts {
    total_records: usize,
    /// Term order follows the input vocabulary; zero counts are kept.
    counts: Vec<(String, usize)>,
}

impl MechanismCounts {
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn count(&self, term: &str) -> Option<usize> {
        self.counts.iter().find(|(t, _)| t == term).map(|(_, c)| *c)
    }

    pub fn percentage(&self, term: &str) -> Option<f64> {
        self.count(term).map(|c| percentage(c, self.total_records))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// Terms seen at least once, most frequent first, ties in term order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        rank_by_count(self.iter().filter(|(_, c)| *c > 0).collect())
    }
}

/// Count, for each term, how many records contain it (case-insensitive).
/// Repeated mentions within one abstract count once.
pub fn count_mechanisms(records: &[AbstractRecord], terms: &[String]) -> MechanismCounts {
    let lowered: Vec<String> = records.iter().map(|r| r.text.to_lowercase()).collect();

    let counts = terms
        .iter()
        .map(|term| {
            let needle = term.to_lowercase();
            let n = lowered.iter().filter(|text| text.contains(needle.as_str())).count();
            (term.clone(), n)
        })
        .collect();

    MechanismCounts { total_records: records.len(), counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::default_mechanism_terms;
    use pretty_assertions::assert_eq;
    use repurpose_test_utils::{corpus_with_term, sample_corpus};

    #[test]
    fn test_percentage_for_known_corpus() {
        let records = corpus_with_term(10, 3, "apoptosis");
        let counts = count_mechanisms(&records, &["apoptosis".to_string()]);
        assert_eq!(counts.count("apoptosis"), Some(3));
        assert_eq!(counts.percentage("apoptosis"), Some(30.0));
        assert_eq!(format!("{:.1}", counts.percentage("apoptosis").unwrap()), "30.0");
    }

    #[test]
    fn test_presence_not_frequency() {
        let records = vec![AbstractRecord::new("1", "Tau tau TAU and more tau")];
        let counts = count_mechanisms(&records, &["tau".to_string()]);
        assert_eq!(counts.count("tau"), Some(1));
    }

    #[test]
    fn test_counts_never_exceed_total() {
        let records = sample_corpus();
        let counts = count_mechanisms(&records, &default_mechanism_terms());
        for (_, c) in counts.iter() {
            assert!(c <= counts.total_records());
        }
    }

    #[test]
    fn test_ranking_excludes_zero_but_map_keeps_them() {
        let counts = count_mechanisms(&sample_corpus(), &default_mechanism_terms());
        assert_eq!(counts.count("cognitive"), Some(0));
        assert_eq!(counts.ranked(), vec![
            ("motor", 2),
            ("dopamine", 1),
            ("neuroprotection", 1),
            ("inflammation", 1),
            ("oxidative stress", 1),
            ("alpha-synuclein", 1),
        ]);
    }

    #[test]
    fn test_empty_corpus_percentage_is_zero() {
        let counts = count_mechanisms(&[], &default_mechanism_terms());
        assert_eq!(counts.percentage("motor"), Some(0.0));
        assert!(counts.ranked().is_empty());
    }
}
