//! Configuration loading for repurpose.
//! Reads repurpose.toml from the current directory or the path in the
//! REPURPOSE_CONFIG env var. Every field has a default, so a partial file or
//! no file at all is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use repurpose_extract::{Category, CategoryVocabulary};
use repurpose_ingestion::SearchQuery;
use repurpose_llm::extraction::{ExtractionSettings, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
use secrecy::SecretString;

pub const KNOWN_BACKENDS: &[&str] = &["openai", "openai_compatible", "ollama"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_mesh_term")]
    pub mesh_term: String,
    #[serde(default = "default_disease_phrase")]
    pub disease_phrase: String,
    #[serde(default = "default_repurposing_terms")]
    pub repurposing_terms: Vec<String>,
    #[serde(default = "default_year_from")]
    pub year_from: u16,
    #[serde(default = "default_year_to")]
    pub year_to: u16,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Sent with every E-utilities request; required in remote mode.
    #[serde(default)]
    pub contact_email: String,
    /// Falls back to NCBI_API_KEY.
    #[serde(default, skip_serializing)]
    pub ncbi_api_key: Option<String>,
}

fn default_mesh_term()         -> String { "Parkinson Disease".to_string() }
fn default_disease_phrase()    -> String { "Parkinson's disease".to_string() }
fn default_repurposing_terms() -> Vec<String> {
    vec!["drug repurposing".to_string(), "drug repositioning".to_string()]
}
fn default_year_from()         -> u16    { 2020 }
fn default_year_to()           -> u16    { 2025 }
fn default_language()          -> String { "English".to_string() }
fn default_max_results()       -> usize  { 20 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mesh_term: default_mesh_term(),
            disease_phrase: default_disease_phrase(),
            repurposing_terms: default_repurposing_terms(),
            year_from: default_year_from(),
            year_to: default_year_to(),
            language: default_language(),
            max_results: default_max_results(),
            contact_email: String::new(),
            ncbi_api_key: None,
        }
    }
}

impl SearchConfig {
    pub fn query(&self) -> SearchQuery {
        SearchQuery {
            mesh_term: self.mesh_term.clone(),
            disease_phrase: self.disease_phrase.clone(),
            repurposing_terms: self.repurposing_terms.clone(),
            year_from: self.year_from,
            year_to: self.year_to,
            language: self.language.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusMode {
    /// Search and fetch from PubMed, then export to `corpus.path`.
    Remote,
    /// Read a previously exported `corpus.path`.
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_corpus_mode")]
    pub mode: CorpusMode,
    #[serde(default = "default_corpus_path")]
    pub path: PathBuf,
    #[serde(default = "default_fetch_interval_ms")]
    pub fetch_interval_ms: u64,
}

fn default_corpus_mode()       -> CorpusMode { CorpusMode::File }
fn default_corpus_path()       -> PathBuf    { PathBuf::from("parkinsons_drug_repurposing.csv") }
fn default_fetch_interval_ms() -> u64        { 500 }

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            mode: default_corpus_mode(),
            path: default_corpus_path(),
            fetch_interval_ms: default_fetch_interval_ms(),
        }
    }
}

impl CorpusConfig {
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.fetch_interval_ms)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    /// One of [`KNOWN_BACKENDS`].
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Required for `openai_compatible`; defaults to the local daemon for `ollama`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Falls back to OPENAI_API_KEY.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_abstract_char_limit")]
    pub abstract_char_limit: usize,
}

fn default_backend()             -> String { "openai".to_string() }
fn default_model()               -> String { DEFAULT_MODEL.to_string() }
fn default_system_prompt()       -> String { DEFAULT_SYSTEM_PROMPT.to_string() }
fn default_temperature()         -> f32    { 0.5 }
fn default_max_tokens()          -> u32    { 500 }
fn default_abstract_char_limit() -> usize  { 1500 }

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: default_backend(),
            model: default_model(),
            base_url: None,
            api_key: None,
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            abstract_char_limit: default_abstract_char_limit(),
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("enabled", &self.enabled)
            .field("backend", &self.backend)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("abstract_char_limit", &self.abstract_char_limit)
            .finish_non_exhaustive()
    }
}

impl LlmConfig {
    pub fn api_key(&self) -> Option<SecretString> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::from(k.to_string()))
    }

    pub fn settings(&self, disease: &str) -> ExtractionSettings {
        ExtractionSettings {
            system_prompt: self.system_prompt.clone(),
            model: Some(self.model.clone()),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            abstract_char_limit: self.abstract_char_limit,
            disease: disease.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_candidates_file")]
    pub candidates_file: String,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
    #[serde(default = "default_extractions_file")]
    pub extractions_file: String,
}

fn default_output_dir()       -> PathBuf { PathBuf::from(".") }
fn default_candidates_file()  -> String  { "drug_candidates.csv".to_string() }
fn default_summary_file()     -> String  { "analysis_summary.txt".to_string() }
fn default_extractions_file() -> String  { "llm_extractions.json".to_string() }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            candidates_file: default_candidates_file(),
            summary_file: default_summary_file(),
            extractions_file: default_extractions_file(),
        }
    }
}

impl OutputConfig {
    pub fn candidates_path(&self) -> PathBuf { self.dir.join(&self.candidates_file) }
    pub fn summary_path(&self) -> PathBuf { self.dir.join(&self.summary_file) }
    pub fn extractions_path(&self) -> PathBuf { self.dir.join(&self.extractions_file) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default = "default_drug_classes")]
    pub drug_classes: Vec<Category>,
    #[serde(default = "default_mechanisms")]
    pub mechanisms: Vec<String>,
}

fn default_drug_classes() -> Vec<Category> {
    CategoryVocabulary::parkinsons_drug_classes().categories().to_vec()
}
fn default_mechanisms() -> Vec<String> { repurpose_extract::default_mechanism_terms() }

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            drug_classes: default_drug_classes(),
            mechanisms: default_mechanisms(),
        }
    }
}

impl VocabularyConfig {
    pub fn drug_class_vocabulary(&self) -> repurpose_common::Result<CategoryVocabulary> {
        CategoryVocabulary::new(self.drug_classes.clone())
    }
}


impl Config {
    /// Load configuration from repurpose.toml.
    /// Checks REPURPOSE_CONFIG env var first, then current directory.
    /// API keys missing from the file are taken from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("REPURPOSE_CONFIG")
            .unwrap_or_else(|_| "repurpose.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("invalid config file {path}: {e}"))?
        } else {
            tracing::info!("No config file at {path}, using built-in defaults");
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Fill unset API keys from `lookup` (the process environment in production).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.llm.api_key.is_none() {
            self.llm.api_key = lookup("OPENAI_API_KEY");
        }
        if self.search.ncbi_api_key.is_none() {
            self.search.ncbi_api_key = lookup("NCBI_API_KEY");
        }
    }

    /// Reject configurations that would fail later in the run.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.vocabulary.drug_class_vocabulary()?;
        if self.vocabulary.mechanisms.iter().any(|m| m.trim().is_empty()) {
            anyhow::bail!("vocabulary.mechanisms contains an empty term");
        }

        if self.corpus.mode == CorpusMode::Remote {
            if self.search.contact_email.trim().is_empty() {
                anyhow::bail!(
                    "search.contact_email is required when corpus.mode = \"remote\" \
                     (NCBI E-utilities usage policy)"
                );
            }
            if self.search.max_results == 0 {
                anyhow::bail!("search.max_results must be at least 1");
            }
            if self.search.year_from > self.search.year_to {
                anyhow::bail!(
                    "search.year_from ({}) is after search.year_to ({})",
                    self.search.year_from, self.search.year_to
                );
            }
        }

        if !KNOWN_BACKENDS.contains(&self.llm.backend.as_str()) {
            anyhow::bail!(
                "unknown llm.backend '{}' (expected one of: {})",
                self.llm.backend,
                KNOWN_BACKENDS.join(", ")
            );
        }
        if self.llm.enabled {
            match self.llm.backend.as_str() {
                "openai" if self.llm.api_key().is_none() => anyhow::bail!(
                    "LLM extraction is enabled but no OpenAI API key was found \
                     (set llm.api_key or OPENAI_API_KEY)"
                ),
                "openai_compatible" if self.llm.base_url.is_none() => {
                    anyhow::bail!("llm.base_url is required for the openai_compatible backend")
                }
                _ => {}
            }
        }

        Ok(())
    }
}
