//! Fixture abstracts shared by the extractor, ranker and agent tests.
//!
//! The texts imitate `efetch rettype=abstract retmode=text` output: a
//! citation line, a blank line, the title, authors, then the abstract body.

use repurpose_common::AbstractRecord;

pub const AMANTADINE_ABSTRACT: &str = "1. Mov Disord. 2023;38(4):512-520.\n\
\n\
Amantadine as a potential treatment for levodopa-induced dyskinesia.\n\
\n\
Smith J, Rivera L.\n\
\n\
Levodopa remains the gold standard, yet dyskinesia limits long-term use. \
Amantadine reduced motor complications and showed neuroprotection in models \
of oxidative stress.";

pub const STATIN_ABSTRACT: &str = "2. J Neurol. 2022;269(1):44-51.\n\
\n\
Repurposing Simvastatin against neuroinflammation in Parkinson disease.\n\
\n\
Chen Y, Okafor A.\n\
\n\
Statins such as simvastatin and atorvastatin reduce inflammation and \
alpha-synuclein aggregation. Dopamine neuron survival improved in mice.";

pub const NO_TITLE_ABSTRACT: &str = "3. Brain. 2021.\n\
\n\
Short line.\n\
\n\
An epidemiological cohort of beta-blocker drug users, including propranolol, \
showed altered motor outcomes across a very long single line of text that \
easily exceeds the two hundred character ceiling imposed on title-like lines \
by the candidate extractor heuristic.";

/// Three-record corpus exercising the classifier, extractor and counter.
pub fn sample_corpus() -> Vec<AbstractRecord> {
    vec![
        AbstractRecord::new("38000001", AMANTADINE_ABSTRACT),
        AbstractRecord::new("38000002", STATIN_ABSTRACT),
        AbstractRecord::new("38000003", NO_TITLE_ABSTRACT),
    ]
}

/// `n` records, the first `with_term` of which contain `term`.
pub fn corpus_with_term(n: usize, with_term: usize, term: &str) -> Vec<AbstractRecord> {
    (0..n)
        .map(|i| {
            let text = if i < with_term {
                format!("Abstract {i} discusses {term} in depth.")
            } else {
                format!("Abstract {i} is about something else.")
            };
            AbstractRecord::new(format!("{}", 1000 + i), text)
        })
        .collect()
}
