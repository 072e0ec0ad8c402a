//! repurpose-extract — Keyword-based signal extraction from abstracts.
//!
//! Three independent passes over the same corpus:
//! - drug-class classification against trigger-phrase vocabularies
//! - title-line candidate extraction (capitalised-token heuristic)
//! - mechanism term presence counting

pub mod vocabulary;
pub mod classify;
pub mod candidates;
pub mod mechanisms;

pub use vocabulary::{Category, CategoryVocabulary, default_mechanism_terms};
pub use classify::{classify, ClassificationResult};
pub use candidates::{extract_candidates, CandidateRecord};
pub use mechanisms::{count_mechanisms, MechanismCounts};
