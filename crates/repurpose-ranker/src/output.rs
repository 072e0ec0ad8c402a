//! Result files written at the end of a run.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use repurpose_common::Result;
use repurpose_extract::CandidateRecord;
use repurpose_llm::LlmExtraction;

use crate::keyword::KeywordReport;

#[derive(Serialize)]
struct CandidateRow<'a> {
    #[serde(rename = "PMID")]
    pmid: &'a str,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Potential_Drugs")]
    potential_drugs: String,
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// `PMID,Title,Potential_Drugs`, one row per candidate.
pub fn write_candidates_csv(path: &Path, candidates: &[CandidateRecord]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for c in candidates {
        writer.serialize(CandidateRow {
            pmid: &c.id,
            title: &c.title_snippet,
            potential_drugs: c.joined_tokens(),
        })?;
    }
    writer.flush()?;
    info!(path = %path.display(), n = candidates.len(), "Saved candidates");
    Ok(())
}

pub fn write_summary(path: &Path, report: &KeywordReport) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, report.render_summary())?;
    info!(path = %path.display(), "Saved analysis summary");
    Ok(())
}

/// Every extraction, error records included, as a pretty-printed JSON array.
pub fn write_extractions_json(path: &Path, extractions: &[LlmExtraction]) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_string_pretty(extractions)?)?;
    info!(path = %path.display(), n = extractions.len(), "Saved LLM extractions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use repurpose_extract::extract_candidates;
    use repurpose_llm::{extraction::parse_response, ExtractionOutcome};
    use repurpose_test_utils::sample_corpus;

    #[test]
    fn test_candidates_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/drug_candidates.csv");
        write_candidates_csv(&path, &extract_candidates(&sample_corpus())).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "PMID,Title,Potential_Drugs");
        assert_eq!(
            lines[1],
            "38000001,Amantadine as a potential treatment for levodopa-induced dyskinesia.,Amantadine"
        );
        assert_eq!(
            lines[2],
            "38000002,Repurposing Simvastatin against neuroinflammation in Parkinson disease.,\"Parkinson, Repurposing Simvastatin\""
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_extractions_json_keeps_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm_extractions.json");
        let extractions = vec![
            LlmExtraction {
                id: "1".to_string(),
                outcome: ExtractionOutcome::Findings(parse_response("1", r#"{"drug_candidates":["Ambroxol"]}"#)),
            },
            LlmExtraction {
                id: "2".to_string(),
                outcome: ExtractionOutcome::Failed { error: "Rate limit exceeded".to_string() },
            },
        ];
        write_extractions_json(&path, &extractions).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json[0]["drug_candidates"][0], "Ambroxol");
        assert_eq!(json[0]["repurposing_potential"], "unknown");
        assert_eq!(json[1], serde_json::json!({"id": "2", "error": "Rate limit exceeded"}));
    }
}
