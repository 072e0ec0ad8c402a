//! Structured repurposing findings from an LLM.
//!
//! One chat completion per abstract. The model is asked for a single JSON
//! object; whatever it wraps around the object is ignored. A reply that
//! cannot be parsed still produces a record, marked `degraded`, so that no
//! abstract silently disappears from the run. A failed call produces an
//! error record instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use repurpose_common::{records::truncate_chars, AbstractRecord};

use crate::backend::{LlmBackend, LlmRequest, Message};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a biomedical research analyst specialising in \
drug repurposing. Read the abstract you are given and answer with a single JSON object using \
exactly the keys pmid, drug_candidates, mechanisms, clinical_application, repurposing_potential \
and key_finding. drug_candidates and mechanisms are lists of short strings. \
repurposing_potential is one of high, medium or low. Do not add any other text.";

/// Degraded records keep this much of the raw reply as the clinical application.
const DEGRADED_APPLICATION_CHARS: usize = 200;
/// ...and this much as the key finding.
const DEGRADED_FINDING_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub system_prompt: String,
    /// `None` lets the backend use its own default model.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Abstracts are cut to this many characters before prompting.
    pub abstract_char_limit: usize,
    pub disease: String,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: Some(DEFAULT_MODEL.to_string()),
            temperature: 0.5,
            max_tokens: 500,
            abstract_char_limit: 1500,
            disease: "Parkinson's disease".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepurposingPotential {
    High,
    Medium,
    Low,
    Unknown,
}

impl RepurposingPotential {
    /// Lenient: anything other than high/medium/low (any case) is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RepurposingPotential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmFindings {
    pub pmid: String,
    pub drug_candidates: Vec<String>,
    pub mechanisms: Vec<String>,
    pub clinical_application: String,
    pub repurposing_potential: RepurposingPotential,
    pub key_finding: String,
    pub degraded: bool,
}

impl LlmFindings {
    /// Stand-in for a reply that held no usable JSON object.
    pub fn degraded(id: &str, raw: &str) -> Self {
        Self {
            pmid: id.to_string(),
            drug_candidates: Vec::new(),
            mechanisms: Vec::new(),
            clinical_application: truncate_chars(raw, DEGRADED_APPLICATION_CHARS).to_string(),
            repurposing_potential: RepurposingPotential::Unknown,
            key_finding: truncate_chars(raw, DEGRADED_FINDING_CHARS).to_string(),
            degraded: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    Findings(LlmFindings),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmExtraction {
    pub id: String,
    #[serde(flatten)]
    pub outcome: ExtractionOutcome,
}

impl LlmExtraction {
    pub fn findings(&self) -> Option<&LlmFindings> {
        match &self.outcome {
            ExtractionOutcome::Findings(f) => Some(f),
            ExtractionOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ExtractionOutcome::Findings(_) => None,
            ExtractionOutcome::Failed { error } => Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }
}

/// User message for one abstract: instruction, truncated abstract, schema.
pub fn build_prompt(record: &AbstractRecord, settings: &ExtractionSettings) -> String {
    let abstract_text = truncate_chars(&record.text, settings.abstract_char_limit);
    format!(
        "Analyze this {disease} drug repurposing abstract and extract:\n\
         {abstract_text}\n\
         \n\
         Return JSON with:\n\
         {{\n    \
             \"pmid\": \"{id}\",\n    \
             \"drug_candidates\": [\"drug1\", \"drug2\"],\n    \
             \"mechanisms\": [\"mechanism1\", \"mechanism2\"],\n    \
             \"clinical_application\": \"brief description\",\n    \
             \"repurposing_potential\": \"high/medium/low\",\n    \
             \"key_finding\": \"most important insight\"\n\
         }}",
        disease = settings.disease,
        id = record.id,
    )
}

/// Slice from the first `{` to the last `}` inclusive, if both exist in order.
fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// String value of `key`. Numbers are rendered; null, missing and other
/// types read as empty.
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// String entries of the list at `key`; other entries are skipped.
fn list_field(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a model reply. Never fails: a reply without a JSON object yields a
/// degraded record. Fields of a well-formed object are read leniently.
pub fn parse_response(id: &str, raw: &str) -> LlmFindings {
    let parsed = json_object_span(raw)
        .ok_or_else(|| "no JSON object in reply".to_string())
        .and_then(|span| serde_json::from_str::<Map<String, Value>>(span).map_err(|e| e.to_string()));

    match parsed {
        Ok(obj) => {
            let pmid = text_field(&obj, "pmid");
            LlmFindings {
                pmid: if pmid.trim().is_empty() { id.to_string() } else { pmid },
                drug_candidates: list_field(&obj, "drug_candidates"),
                mechanisms: list_field(&obj, "mechanisms"),
                clinical_application: text_field(&obj, "clinical_application"),
                repurposing_potential: RepurposingPotential::from_label(
                    &text_field(&obj, "repurposing_potential"),
                ),
                key_finding: text_field(&obj, "key_finding"),
                degraded: false,
            }
        }
        Err(reason) => {
            debug!(pmid = id, %reason, "LLM reply not parseable, keeping degraded record");
            LlmFindings::degraded(id, raw)
        }
    }
}

pub struct LlmExtractor {
    backend: Arc<dyn LlmBackend>,
    settings: ExtractionSettings,
}

impl LlmExtractor {
    pub fn new(backend: Arc<dyn LlmBackend>, settings: ExtractionSettings) -> Self {
        Self { backend, settings }
    }

    /// Extract findings for one abstract. Call failures become error records.
    pub async fn extract(&self, record: &AbstractRecord) -> LlmExtraction {
        let req = LlmRequest {
            messages: vec![
                Message::system(self.settings.system_prompt.clone()),
                Message::user(build_prompt(record, &self.settings)),
            ],
            model: self.settings.model.clone(),
            max_tokens: Some(self.settings.max_tokens),
            temperature: Some(self.settings.temperature),
        };

        let outcome = match self.backend.complete(req).await {
            Ok(resp) => ExtractionOutcome::Findings(parse_response(&record.id, &resp.content)),
            Err(e) => {
                warn!(pmid = %record.id, error = %e, "LLM call failed");
                ExtractionOutcome::Failed { error: e.to_string() }
            }
        };

        LlmExtraction { id: record.id.clone(), outcome }
    }

    /// Sequentially extract every record, in corpus order.
    pub async fn extract_all(&self, records: &[AbstractRecord]) -> Vec<LlmExtraction> {
        let n = records.len();
        let mut out = Vec::with_capacity(n);
        for (i, record) in records.iter().enumerate() {
            info!("[{}/{}] Processing PMID: {}", i + 1, n, record.id);
            let extraction = self.extract(record).await;
            if let Some(f) = extraction.findings() {
                info!(
                    pmid = %record.id,
                    drugs = %f.drug_candidates.join(", "),
                    potential = %f.repurposing_potential,
                    "Extracted"
                );
            }
            out.push(extraction);
        }
        info!(
            analysed = out.iter().filter(|e| !e.is_error()).count(),
            failed = out.iter().filter(|e| e.is_error()).count(),
            "LLM extraction complete"
        );
        out
    }
}
