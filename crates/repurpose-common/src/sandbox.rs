use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::RepurposeError;

/// Hosts the triage run is expected to talk to.
const DEFAULT_ALLOWLIST: &[&str] = &[
    "eutils.ncbi.nlm.nih.gov", // PubMed E-utilities
];

/// An HTTP client that only allows requests to approved domains.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and a 30 s timeout.
    pub fn new() -> Result<Self, RepurposeError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, RepurposeError> {
        let allowlist = DEFAULT_ALLOWLIST.iter().map(|d| d.to_string()).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("repurpose/", env!("CARGO_PKG_VERSION"), " (literature triage)"))
            .build()
            .map_err(|e| RepurposeError::Ingestion(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Allows the host of `url` (and its subdomains). Returns false when
    /// `url` has no host.
    pub fn allow_host_of(&mut self, url: &str) -> bool {
        match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) {
            Some(host) => {
                tracing::debug!(%host, "Added host to sandbox allowlist");
                self.allowlist.insert(host);
                true
            }
            None => false,
        }
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or a subdomain of an allowed domain
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, RepurposeError> {
        self.check(url)?;
        Ok(self.client.get(url))
    }

    fn check(&self, url: &str) -> Result<(), RepurposeError> {
        if self.is_allowed(url) {
            return Ok(());
        }
        tracing::warn!(url, "Blocked request outside the sandbox allowlist");
        Err(RepurposeError::Security(format!(
            "Network capabilities capped: domain not in allowlist for URL {}",
            url
        )))
    }
}
