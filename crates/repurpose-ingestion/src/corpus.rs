//! Flat-file corpus export and reload (`PMID`, `Abstract` columns).

use std::path::Path;

use tracing::info;

use repurpose_common::{AbstractRecord, Result};

/// Write the corpus as CSV, overwriting any existing file.
pub fn write_corpus(path: &Path, records: &[AbstractRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), count = records.len(), "Corpus exported");
    Ok(())
}

/// Read a corpus previously written by [`write_corpus`] (or any CSV with
/// `PMID` and `Abstract` headers). Extra columns are ignored.
pub fn read_corpus(path: &Path) -> Result<Vec<AbstractRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<AbstractRecord>, csv::Error>>()?;
    info!(path = %path.display(), count = records.len(), "Corpus loaded from file");
    Ok(records)
}
