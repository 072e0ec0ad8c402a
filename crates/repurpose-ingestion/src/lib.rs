//! repurpose-ingestion — Corpus loading for literature triage.
//! - PubMed E-utilities search and per-PMID abstract fetch
//! - Boolean query construction (disease, repurposing terms, dates, language)
//! - Rate-limited sequential fetching with per-record failure isolation
//! - Flat-file (CSV) corpus export and reload

pub mod sources;
pub mod query;
pub mod corpus;
pub mod loader;

pub use loader::{CorpusLoader, CorpusSource, LoadResult};
pub use query::SearchQuery;
