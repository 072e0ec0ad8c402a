//! repurpose-ranker — Aggregation and reporting for both triage pipelines.
//!
//! The keyword pipeline's three passes are bundled into a [`KeywordReport`];
//! LLM extractions are folded into an [`AggregateReport`]. Both render to
//! console text, and [`output`] writes the result files.

pub mod aggregate;
pub mod keyword;
pub mod llm_report;
pub mod output;

pub use aggregate::{aggregate, AggregateReport, FrequencyTable, HighPotentialFinding};
pub use keyword::{KeywordReport, SearchCriteria};
pub use llm_report::render_llm_report;
