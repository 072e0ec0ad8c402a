//! Literature source clients.

pub mod pubmed;

use async_trait::async_trait;

/// Common interface for literature search backends.
#[async_trait]
pub trait LiteratureSource: Send + Sync {
    /// Search for articles matching a query, returns identifiers in rank order.
    async fn search_ids(
        &self,
        query: &str,
        max_results: usize,
    ) -> anyhow::Result<Vec<String>>;

    /// Fetch the plain-text abstract for one identifier.
    async fn fetch_abstract(
        &self,
        id: &str,
    ) -> anyhow::Result<String>;
}
