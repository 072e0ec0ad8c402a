//! repurpose-llm — LLM backends and structured abstract extraction.
//! - `backend`: the LlmBackend trait with OpenAI, OpenAI-compatible and Ollama implementations
//! - `extraction`: per-abstract prompting and tolerant JSON parsing of the reply

pub mod backend;
pub mod extraction;

pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message};
pub use extraction::{
    ExtractionOutcome, ExtractionSettings, LlmExtraction, LlmExtractor, LlmFindings,
    RepurposingPotential,
};
