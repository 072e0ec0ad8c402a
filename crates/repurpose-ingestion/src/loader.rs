//! Corpus loader.
//!
//! Orchestrates the flow for one run:
//!   1. Search the literature source with the boolean query
//!   2. Fetch each abstract individually, waiting between fetches
//!   3. Export the fetched corpus to CSV for reuse
//!
//! or, in file mode, reads a previously exported CSV. A failed fetch is
//! local to its record: it is logged, listed in [`LoadResult::errors`], and
//! the record is kept with empty text.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, instrument, warn};

use repurpose_common::{AbstractRecord, RepurposeError, Result};
use crate::corpus;
use crate::sources::LiteratureSource;

/// NCBI allows a few requests per second without a key; never go faster
/// than one fetch per half second.
pub const MIN_FETCH_INTERVAL: Duration = Duration::from_millis(500);

/// Where the corpus comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    Remote { query: String, max_results: usize },
    File(PathBuf),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadResult {
    pub records: Vec<AbstractRecord>,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

pub struct CorpusLoader {
    source: Option<Arc<dyn LiteratureSource>>,
    fetch_interval: Duration,
    export_path: Option<PathBuf>,
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusLoader {
    /// A loader that can only read flat files until a source is attached.
    pub fn new() -> Self {
        Self {
            source: None,
            fetch_interval: MIN_FETCH_INTERVAL,
            export_path: None,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn LiteratureSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Intervals shorter than [`MIN_FETCH_INTERVAL`] are raised to it.
    pub fn with_fetch_interval(mut self, interval: Duration) -> Self {
        self.fetch_interval = interval.max(MIN_FETCH_INTERVAL);
        self
    }

    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = Some(path.into());
        self
    }

    pub fn fetch_interval(&self) -> Duration {
        self.fetch_interval
    }

    pub async fn load(&self, source: &CorpusSource) -> Result<LoadResult> {
        let t0 = Instant::now();
        let mut result = match source {
            CorpusSource::Remote { query, max_results } => self.load_remote(query, *max_results).await?,
            CorpusSource::File(path) => LoadResult {
                records: corpus::read_corpus(path)?,
                errors: Vec::new(),
                duration_ms: 0,
            },
        };
        result.duration_ms = t0.elapsed().as_millis() as u64;
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn load_remote(&self, query: &str, max_results: usize) -> Result<LoadResult> {
        let source = self.source.as_ref().ok_or_else(|| {
            RepurposeError::Ingestion("remote corpus requested but no literature source configured".to_string())
        })?;

        let ids = source
            .search_ids(query, max_results)
            .await
            .map_err(|e| RepurposeError::Other(e.context("literature search failed")))?;
        info!(n = ids.len(), "Found articles");

        let mut records = Vec::with_capacity(ids.len());
        let mut errors = Vec::new();
        let mut failed = 0usize;

        for (i, pmid) in ids.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.fetch_interval).await;
            }
            match source.fetch_abstract(pmid).await {
                Ok(text) => records.push(AbstractRecord::new(pmid.clone(), text)),
                Err(e) => {
                    let msg = format!("fetch failed for PMID {pmid}: {e}");
                    warn!("{}", &msg);
                    errors.push(msg);
                    failed += 1;
                    records.push(AbstractRecord::new(pmid.clone(), String::new()));
                }
            }
        }

        if let Some(path) = &self.export_path {
            if let Err(e) = corpus::write_corpus(path, &records) {
                let msg = format!("corpus export to {} failed: {e}", path.display());
                warn!("{}", &msg);
                errors.push(msg);
            }
        }

        info!(
            fetched = records.len() - failed,
            failed,
            "Corpus fetch complete"
        );

        Ok(LoadResult { records, errors, duration_ms: 0 })
    }
}
