//! PubMed boolean query construction.

/// Parameters of the repurposing literature search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// MeSH heading for the disease, e.g. `Parkinson Disease`.
    pub mesh_term: String,
    /// Free-text disease phrase searched in all fields.
    pub disease_phrase: String,
    /// Repurposing phrases, OR-ed together.
    pub repurposing_terms: Vec<String>,
    pub year_from: u16,
    pub year_to: u16,
    pub language: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            mesh_term: "Parkinson Disease".to_string(),
            disease_phrase: "Parkinson's disease".to_string(),
            repurposing_terms: vec![
                "drug repurposing".to_string(),
                "drug repositioning".to_string(),
            ],
            year_from: 2020,
            year_to: 2025,
            language: "English".to_string(),
        }
    }
}

impl SearchQuery {
    /// Render the E-utilities `term` string.
    ///
    /// `(disease MeSH OR disease phrase) AND (repurposing terms) AND (date range) AND language`
    pub fn build(&self) -> String {
        let mut parts = vec![format!(
            "(\"{}\"[MeSH Terms] OR \"{}\"[All Fields])",
            self.mesh_term, self.disease_phrase
        )];

        if !self.repurposing_terms.is_empty() {
            let terms: Vec<String> = self.repurposing_terms
                .iter()
                .map(|t| format!("\"{t}\"[All Fields]"))
                .collect();
            parts.push(format!("({})", terms.join(" OR ")));
        }

        parts.push(format!(
            "(\"{}\"[Date - Publication] : \"{}\"[Date - Publication])",
            self.year_from, self.year_to
        ));
        parts.push(format!("\"{}\"[Language]", self.language));

        parts.join(" AND ")
    }

    /// Date range as shown in reports, e.g. `2020-2025`.
    pub fn date_range(&self) -> String {
        format!("{}-{}", self.year_from, self.year_to)
    }
}
