//! Curated trigger-phrase vocabularies.

use serde::{Deserialize, Serialize};
use repurpose_common::{RepurposeError, Result};

/// Parkinson's-relevant drug classes and the phrases that signal them.
const PARKINSONS_DRUG_CLASSES: &[(&str, &[&str])] = &[
    ("Levodopa",          &["levodopa", "l-dopa", "ldopa"]),
    ("Dopamine agonists", &["dopamine agonist", "pramipexole", "ropinirole", "bromocriptine"]),
    ("MAO inhibitors",    &["monoamine oxidase", "selegiline", "rasagiline"]),
    ("COMT inhibitors",   &["catechol-o-methyltransferase", "entacapone", "tolcapone"]),
    ("Anticholinergics",  &["anticholinergic", "benztropine", "trihexyphenidyl"]),
    ("Amantadine",        &["amantadine"]),
    ("Codeine",           &["codeine"]),
    ("Opioids",           &["opioid", "morphine", "tramadol"]),
    ("NSAIDs",            &["nsaid", "ibuprofen", "naproxen"]),
    ("Statins",           &["statin", "simvastatin", "atorvastatin"]),
    ("Antihistamines",    &["antihistamine", "diphenhydramine"]),
    ("Beta-blockers",     &["beta-blocker", "propranolol", "metoprolol"]),
];

/// Biological mechanism terms counted across the corpus.
const MECHANISM_TERMS: &[&str] = &[
    "dopamine",
    "neurotransmitter",
    "neuroprotection",
    "inflammation",
    "oxidative stress",
    "mitochondrial",
    "apoptosis",
    "tau",
    "alpha-synuclein",
    "motor",
    "cognitive",
];

/// One named category with its ordered trigger phrases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub phrases: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, phrases: &[&str]) -> Self {
        Self {
            name: name.into(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Ordered category → phrases mapping.
///
/// Every category has a non-empty name and at least one non-empty phrase.
/// Phrases are stored lower-cased so matching against lower-cased text is
/// case-insensitive on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryVocabulary {
    categories: Vec<Category>,
}

impl CategoryVocabulary {
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        if categories.is_empty() {
            return Err(RepurposeError::Config("vocabulary has no categories".to_string()));
        }

        let mut normalised = Vec::with_capacity(categories.len());
        for category in categories {
            if category.name.trim().is_empty() {
                return Err(RepurposeError::Config("vocabulary category with empty name".to_string()));
            }
            let phrases: Vec<String> = category.phrases
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();
            if phrases.is_empty() {
                return Err(RepurposeError::Config(format!(
                    "vocabulary category '{}' has no trigger phrases",
                    category.name
                )));
            }
            if normalised.iter().any(|c: &Category| c.name == category.name) {
                return Err(RepurposeError::Config(format!(
                    "vocabulary category '{}' is listed twice",
                    category.name
                )));
            }
            normalised.push(Category { name: category.name, phrases });
        }

        Ok(Self { categories: normalised })
    }

    /// Drug-class vocabulary for Parkinson's disease repurposing triage.
    pub fn parkinsons_drug_classes() -> Self {
        Self {
            categories: PARKINSONS_DRUG_CLASSES
                .iter()
                .map(|(name, phrases)| Category::new(*name, phrases))
                .collect(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryVocabulary {
    fn default() -> Self {
        Self::parkinsons_drug_classes()
    }
}

pub fn default_mechanism_terms() -> Vec<String> {
    MECHANISM_TERMS.iter().map(|t| t.to_string()).collect()
}
