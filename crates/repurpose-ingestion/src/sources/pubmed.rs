//! PubMed E-utilities client.
//!
//! Endpoints used:
//!   esearch: https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi
//!   efetch:  https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi
//!
//! NCBI asks every client to identify itself with `tool` and `email`
//! parameters; both are sent on every request.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use repurpose_common::{sandbox::SandboxClient as Client, RepurposeError};
use tracing::{debug, instrument};

use super::LiteratureSource;

pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Identification NCBI requires from E-utilities callers.
#[derive(Debug)]
pub struct PubMedContact {
    pub email: String,
    pub tool: String,
    pub api_key: Option<SecretString>,
}

impl PubMedContact {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            tool: "repurpose".to_string(),
            api_key: None,
        }
    }
}

pub struct PubMedClient {
    client: Client,
    base_url: String,
    contact: PubMedContact,
}

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    #[serde(default)]
    esearchresult: ESearchResult,
}

#[derive(Debug, Deserialize, Default)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

impl PubMedClient {
    pub fn new(contact: PubMedContact) -> Result<Self, RepurposeError> {
        if contact.email.trim().is_empty() {
            return Err(RepurposeError::Config(
                "PubMed contact email is required by the NCBI usage policy".to_string(),
            ));
        }
        Ok(Self {
            client: Client::new()?,
            base_url: EUTILS_BASE_URL.to_string(),
            contact,
        })
    }

    /// Point the client at a different E-utilities root (mirrors, test servers).
    /// The root's host joins the sandbox allowlist.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self.client.allow_host_of(&self.base_url);
        self
    }

    fn base_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("tool", self.contact.tool.clone()),
            ("email", self.contact.email.clone()),
        ];
        if let Some(key) = &self.contact.api_key {
            params.push(("api_key", key.expose_secret().to_string()));
        }
        params
    }

    /// Search PubMed and return a list of PMIDs.
    #[instrument(skip(self))]
    async fn esearch(&self, query: &str, max: usize) -> anyhow::Result<Vec<String>> {
        let mut params = self.base_params();
        params.push(("term", query.to_string()));
        params.push(("retmax", max.to_string()));
        params.push(("retmode", "json".to_string()));

        let url = format!("{}/esearch.fcgi", self.base_url);
        let resp: ESearchResponse = self.client
            .get(&url)?
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let ids = resp.esearchresult.idlist;
        debug!(?ids, "PubMed esearch returned PMIDs");
        Ok(ids)
    }

    /// Fetch the plain-text abstract view for a single PMID.
    #[instrument(skip(self))]
    async fn efetch_text(&self, pmid: &str) -> anyhow::Result<String> {
        let mut params = self.base_params();
        params.push(("id", pmid.to_string()));
        params.push(("rettype", "abstract".to_string()));
        params.push(("retmode", "text".to_string()));

        let url = format!("{}/efetch.fcgi", self.base_url);
        let text = self.client
            .get(&url)?
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!(pmid, chars = text.len(), "PubMed efetch returned abstract");
        Ok(text)
    }
}

#[async_trait]
impl LiteratureSource for PubMedClient {
    async fn search_ids(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<String>> {
        self.esearch(query, max_results).await
    }

    async fn fetch_abstract(&self, id: &str) -> anyhow::Result<String> {
        self.efetch_text(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_contact_email() {
        let err = PubMedClient::new(PubMedContact::new("  ")).err().unwrap();
        assert!(matches!(err, RepurposeError::Config(_)));
    }

    #[test]
    fn test_base_params_include_identification() {
        let mut contact = PubMedContact::new("triage@example.org");
        contact.api_key = Some(SecretString::from("ncbi-key".to_string()));
        let client = PubMedClient::new(contact).unwrap();
        let params = client.base_params();
        assert!(params.contains(&("email", "triage@example.org".to_string())));
        assert!(params.contains(&("tool", "repurpose".to_string())));
        assert!(params.contains(&("api_key", "ncbi-key".to_string())));
    }

    #[test]
    fn test_parse_esearch_json() {
        let json = r#"{"header":{},"esearchresult":{"count":"2","idlist":["38000001","38000002"]}}"#;
        let resp: ESearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.esearchresult.idlist, vec!["38000001", "38000002"]);

        let empty: ESearchResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.esearchresult.idlist.is_empty());
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let client = PubMedClient::new(PubMedContact::new("a@b.org"))
            .unwrap()
            .with_base_url("http://127.0.0.1:9000/");
        assert_eq!(client.base_url, "http://127.0.0.1:9000");
        assert!(client.client.is_allowed("http://127.0.0.1:9000/esearch.fcgi"));
    }
}
