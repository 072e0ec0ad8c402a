//! Drug-class classification by trigger-phrase substring matching.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use repurpose_common::{ranking::rank_by_count, AbstractRecord};
use crate::vocabulary::CategoryVocabulary;

/// Records matched by one category, in corpus order, each id at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryHits {
    pub category: String,
    pub ids: Vec<String>,
}

/// Category → matching record ids, kept in vocabulary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    hits: Vec<CategoryHits>,
}

impl ClassificationResult {
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.hits
            .iter()
            .find(|h| h.category == category)
            .map(|h| h.ids.as_slice())
    }

    pub fn contains(&self, category: &str, id: &str) -> bool {
        self.get(category).is_some_and(|ids| ids.iter().any(|i| i == id))
    }

    /// Categories with at least one hit, most records first.
    /// Ties keep vocabulary order.
    pub fn ranked(&self) -> Vec<&CategoryHits> {
        let counted = self.hits
            .iter()
            .filter(|h| !h.ids.is_empty())
            .map(|h| (h, h.ids.len()))
            .collect();
        rank_by_count(counted).into_iter().map(|(h, _)| h).collect()
    }

    /// Number of categories matched by at least one record.
    pub fn matched_categories(&self) -> usize {
        self.hits.iter().filter(|h| !h.ids.is_empty()).count()
    }

    pub fn most_mentioned(&self) -> Option<&CategoryHits> {
        self.ranked().into_iter().next()
    }
}

/// Tag every record with the categories it mentions.
///
/// The first matching phrase settles a category for a record; remaining
/// phrases of that category are not scanned. A record can land in several
/// categories.
pub fn classify(records: &[AbstractRecord], vocabulary: &CategoryVocabulary) -> ClassificationResult {
    let mut hits: Vec<CategoryHits> = vocabulary
        .categories()
        .iter()
        .map(|c| CategoryHits { category: c.name.clone(), ids: Vec::new() })
        .collect();
    let mut seen: Vec<HashSet<&str>> = vec![HashSet::new(); hits.len()];

    for record in records {
        let lowered = record.text.to_lowercase();
        for (idx, category) in vocabulary.categories().iter().enumerate() {
            if let Some(phrase) = category.phrases.iter().find(|p| lowered.contains(p.as_str())) {
                if seen[idx].insert(record.id.as_str()) {
                    debug!(pmid = %record.id, category = %category.name, phrase = %phrase, "category matched");
                    hits[idx].ids.push(record.id.clone());
                }
            }
        }
    }

    ClassificationResult { hits }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Category;
    use pretty_assertions::assert_eq;
    use repurpose_test_utils::sample_corpus;

    fn levodopa_only() -> CategoryVocabulary {
        CategoryVocabulary::new(vec![Category::new("Levodopa", &["levodopa"])]).unwrap()
    }

    #[test]
    fn test_single_category_single_record() {
        let records = vec![AbstractRecord::new("1", "Levodopa therapy...")];
        let result = classify(&records, &levodopa_only());
        assert_eq!(result.get("Levodopa"), Some(&["1".to_string()][..]));
    }

    #[test]
    fn test_repeated_phrases_count_once() {
        let vocab = CategoryVocabulary::new(vec![
            Category::new("Levodopa", &["levodopa", "l-dopa"]),
        ]).unwrap();
        let records = vec![
            AbstractRecord::new("7", "LEVODOPA and l-dopa, levodopa again"),
            // Same id appearing twice in the corpus
            AbstractRecord::new("7", "levodopa"),
        ];
        let result = classify(&records, &vocab);
        assert_eq!(result.get("Levodopa").unwrap().len(), 1);
    }

    #[test]
    fn test_record_can_match_several_categories() {
        let result = classify(&sample_corpus(), &CategoryVocabulary::default());
        assert!(result.contains("Levodopa", "38000001"));
        assert!(result.contains("Amantadine", "38000001"));
        assert!(result.contains("Statins", "38000002"));
        assert!(result.contains("Beta-blockers", "38000003"));
        assert!(!result.contains("Opioids", "38000001"));
        assert_eq!(result.matched_categories(), 4);
    }

    #[test]
    fn test_membership_iff_phrase_present() {
        let vocab = CategoryVocabulary::default();
        let records = sample_corpus();
        let result = classify(&records, &vocab);
        for record in &records {
            let lowered = record.text.to_lowercase();
            for category in vocab.categories() {
                let expected = category.phrases.iter().any(|p| lowered.contains(p.as_str()));
                assert_eq!(result.contains(&category.name, &record.id), expected,
                    "category {} / record {}", category.name, record.id);
            }
        }
    }

    #[test]
    fn test_ranking_ties_follow_vocabulary_order() {
        let vocab = CategoryVocabulary::new(vec![
            Category::new("Opioids", &["opioid"]),
            Category::new("NSAIDs", &["ibuprofen"]),
            Category::new("Statins", &["statin"]),
        ]).unwrap();
        let records = vec![
            AbstractRecord::new("1", "statin use"),
            AbstractRecord::new("2", "statin and ibuprofen"),
            AbstractRecord::new("3", "ibuprofen alone"),
            AbstractRecord::new("4", "opioid exposure"),
        ];
        let result = classify(&records, &vocab);
        let order: Vec<&str> = result.ranked().iter().map(|h| h.category.as_str()).collect();
        assert_eq!(order, vec!["NSAIDs", "Statins", "Opioids"]);
        assert_eq!(result.most_mentioned().unwrap().category, "NSAIDs");
    }

    #[test]
    fn test_empty_corpus_has_no_ranking() {
        let result = classify(&[], &CategoryVocabulary::default());
        assert!(result.ranked().is_empty());
        assert!(result.most_mentioned().is_none());
        assert_eq!(result.get("Levodopa"), Some(&[][..]));
    }
}
