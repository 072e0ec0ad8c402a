//! Wiring between configuration and the library crates.
//!
//! Load the corpus once, run the keyword pipeline, then (if enabled) the
//! LLM pipeline. The two pipelines share the corpus and nothing else.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use repurpose_common::AbstractRecord;
use repurpose_extract::{classify, count_mechanisms, extract_candidates};
use repurpose_ingestion::sources::pubmed::{PubMedClient, PubMedContact};
use repurpose_ingestion::{CorpusLoader, CorpusSource, LoadResult};
use repurpose_llm::backend::{OllamaBackend, OpenAiBackend, OpenAiCompatibleBackend};
use repurpose_llm::{LlmBackend, LlmExtractor};
use repurpose_ranker::{aggregate, output, render_llm_report, AggregateReport, KeywordReport, SearchCriteria};

use crate::config::{Config, CorpusMode, LlmConfig, DEFAULT_OLLAMA_URL};

/// Loader and source description for the configured corpus mode.
pub fn build_loader(config: &Config) -> anyhow::Result<(CorpusLoader, CorpusSource)> {
    match config.corpus.mode {
        CorpusMode::File => Ok((CorpusLoader::new(), CorpusSource::File(config.corpus.path.clone()))),
        CorpusMode::Remote => {
            let mut contact = PubMedContact::new(config.search.contact_email.clone());
            contact.api_key = config.search.ncbi_api_key
                .as_deref()
                .filter(|k| !k.trim().is_empty())
                .map(|k| secrecy::SecretString::from(k.to_string()));
            let client = PubMedClient::new(contact)?;

            let loader = CorpusLoader::new()
                .with_source(Arc::new(client))
                .with_fetch_interval(config.corpus.fetch_interval())
                .with_export_path(config.corpus.path.clone());
            let source = CorpusSource::Remote {
                query: config.search.query().build(),
                max_results: config.search.max_results,
            };
            Ok((loader, source))
        }
    }
}

pub fn build_backend(llm: &LlmConfig) -> anyhow::Result<Arc<dyn LlmBackend>> {
    let backend: Arc<dyn LlmBackend> = match llm.backend.as_str() {
        "openai" => {
            let key = llm.api_key().context("no OpenAI API key configured")?;
            Arc::new(OpenAiBackend::new(key, llm.model.clone())?)
        }
        "openai_compatible" => {
            let base_url = llm.base_url.clone().context("llm.base_url is not set")?;
            Arc::new(OpenAiCompatibleBackend::new(base_url, llm.model.clone(), llm.api_key())?)
        }
        "ollama" => {
            let base_url = llm.base_url.clone().unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            Arc::new(OllamaBackend::new(base_url, llm.model.clone())?)
        }
        other => anyhow::bail!("unknown llm.backend '{other}'"),
    };
    info!(backend = %llm.backend, model = backend.model_id(), local = backend.is_local(), "LLM backend ready");
    Ok(backend)
}

fn search_criteria(config: &Config) -> SearchCriteria {
    let query = config.search.query();
    SearchCriteria {
        disease: config.search.disease_phrase.clone(),
        date_range: query.date_range(),
        language: query.language,
        ..SearchCriteria::default()
    }
}

/// Methods 1-3 over the corpus; prints the console report and writes
/// the narrative summary, plus the candidates CSV when there are any.
pub fn run_keyword_pipeline(records: &[AbstractRecord], config: &Config) -> anyhow::Result<KeywordReport> {
    let vocabulary = config.vocabulary.drug_class_vocabulary()?;

    let report = KeywordReport::new(
        search_criteria(config),
        records.len(),
        classify(records, &vocabulary),
        extract_candidates(records),
        count_mechanisms(records, &config.vocabulary.mechanisms),
    );

    println!("{}", report.render_console());

    if report.candidates.is_empty() {
        info!("No title candidates, skipping {}", config.output.candidates_path().display());
    } else {
        output::write_candidates_csv(&config.output.candidates_path(), &report.candidates)?;
    }
    output::write_summary(&config.output.summary_path(), &report)?;
    Ok(report)
}

/// One LLM call per record, in corpus order; prints the aggregate report
/// and writes every extraction to JSON.
pub async fn run_llm_pipeline(
    records: &[AbstractRecord],
    backend: Arc<dyn LlmBackend>,
    config: &Config,
) -> anyhow::Result<AggregateReport> {
    let extractor = LlmExtractor::new(backend, config.llm.settings(&config.search.disease_phrase));
    info!(n = records.len(), "Analyzing abstracts with LLM");

    let extractions = extractor.extract_all(records).await;
    let report = aggregate(&extractions);

    println!("{}", render_llm_report(&report));

    output::write_extractions_json(&config.output.extractions_path(), &extractions)?;
    Ok(report)
}

pub async fn run(config: &Config) -> anyhow::Result<()> {
    let (loader, source) = build_loader(config)?;
    let LoadResult { records, errors, duration_ms } = loader.load(&source).await?;
    info!(records = records.len(), errors = errors.len(), duration_ms, "Corpus loaded");
    for e in &errors {
        warn!("{e}");
    }

    if records.is_empty() {
        warn!("Corpus is empty, reports will contain no findings");
    }

    run_keyword_pipeline(&records, config)?;

    if config.llm.enabled {
        let backend = build_backend(&config.llm)?;
        run_llm_pipeline(&records, backend, config).await?;
    } else {
        info!("LLM extraction disabled (set llm.enabled = true to run it)");
    }

    Ok(())
}
