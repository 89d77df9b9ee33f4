use super::SearchSnippet;
use crate::error::RetrievalError;
use async_trait::async_trait;

/// Seam over the web search provider. The pipeline depends on this, never on
/// a concrete wire format.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider identifier (e.g. "tavily").
    fn name(&self) -> &str;

    /// Fetch up to `limit` ranked snippets for `query`, preserving provider
    /// order. Zero results is success, not an error; callers treat the empty
    /// sequence as the uniform not-available signal.
    async fn retrieve(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<SearchSnippet>, RetrievalError>;
}
