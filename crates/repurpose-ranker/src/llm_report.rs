//! Console rendering of the aggregated LLM findings.

use std::fmt::Write as _;

use repurpose_common::records::truncate_chars;

use crate::aggregate::AggregateReport;

pub const TOP_DRUGS: usize = 15;
pub const TOP_MECHANISMS: usize = 10;
pub const HIGH_POTENTIAL_SHOWN: usize = 5;
const FINDING_CHARS: usize = 100;

pub fn render_llm_report(report: &AggregateReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);
    let dash = "-".repeat(80);

    let _ = writeln!(out, "\n{rule}\nLLM DRUG REPURPOSING FINDINGS\n{rule}");
    let _ = writeln!(
        out,
        "Abstracts analysed: {} ({} degraded), failed: {}\n",
        report.analysed, report.degraded, report.failed
    );

    let _ = writeln!(out, "Drug Repurposing Candidates\n{dash}");
    for (i, (drug, count)) in report.drugs.top(TOP_DRUGS).into_iter().enumerate() {
        let _ = writeln!(out, "{:2}. {drug:30} - Found in {count} abstract(s)", i + 1);
    }

    let _ = writeln!(out, "\nMechanisms\n{dash}");
    for (i, (mechanism, count)) in report.mechanisms.top(TOP_MECHANISMS).into_iter().enumerate() {
        let _ = writeln!(out, "{:2}. {mechanism:40} - Mentioned in {count} abstract(s)", i + 1);
    }

    let _ = writeln!(out, "\nHigh-Potential Candidates\n{dash}");
    if report.high_potential.is_empty() {
        let _ = writeln!(out, "No high-potential candidates identified");
    }
    for item in report.high_potential.iter().take(HIGH_POTENTIAL_SHOWN) {
        let _ = writeln!(out, "\nPMID: {}", item.pmid);
        let _ = writeln!(out, "Drugs: {}", item.drugs.join(", "));
        let _ = writeln!(out, "Finding: {}...", truncate_chars(&item.finding, FINDING_CHARS));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, HighPotentialFinding};

    #[test]
    fn test_no_high_potential_message() {
        let text = render_llm_report(&aggregate(&[]));
        assert!(text.contains("No high-potential candidates identified"));
        assert!(text.contains("Abstracts analysed: 0 (0 degraded), failed: 0"));
    }

    #[test]
    fn test_limits_and_formatting() {
        let mut report = AggregateReport::default();
        for i in 0..20 {
            report.drugs.add(&format!("drug{i:02}"));
        }
        report.mechanisms.add("autophagy");
        for i in 0..7 {
            report.high_potential.push(HighPotentialFinding {
                pmid: format!("{i}"),
                drugs: vec!["Exenatide".to_string(), "Lixisenatide".to_string()],
                finding: "f".repeat(150),
            });
        }

        let text = render_llm_report(&report);
        assert!(text.contains(" 1. drug00                         - Found in 1 abstract(s)"));
        assert!(text.contains("15. drug14"));
        assert!(!text.contains("drug15"));
        assert!(text.contains(" 1. autophagy"));
        assert_eq!(text.matches("PMID: ").count(), HIGH_POTENTIAL_SHOWN);
        assert!(text.contains("Drugs: Exenatide, Lixisenatide"));
        assert!(text.contains(&format!("Finding: {}...", "f".repeat(100))));
    }
}
