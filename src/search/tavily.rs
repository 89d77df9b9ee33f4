//! Tavily search client (`POST /search`, bearer auth).

use super::{SearchProvider, SearchSnippet};
use crate::config::SearchDepth;
use crate::error::RetrievalError;
use crate::providers::{build_provider_client, scrub::api_failure};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct TavilyClient {
    depth: SearchDepth,
    /// Search endpoint, joined to the base URL once at build time.
    search_url: String,
    /// `Authorization` header value, formatted once at build time.
    auth_header: String,
    client: Client,
}

impl TavilyClient {
    pub fn new(base_url: &str, api_key: &str, depth: SearchDepth) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            depth,
            search_url: format!("{base_url}/search"),
            auth_header: format!("Bearer {api_key}"),
            client: build_provider_client(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_depth: String,
    max_results: u8,
    include_answer: bool,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchSnippet>,
}

#[async_trait]
impl SearchProvider for TavilyClient {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn retrieve(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<SearchSnippet>, RetrievalError> {
        let request = SearchRequest {
            query,
            search_depth: self.depth.to_string(),
            max_results: limit,
            include_answer: false,
            include_raw_content: false,
        };

        let response = self
            .client
            .post(&self.search_url)
            .header("Authorization", &self.auth_header)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = api_failure(response).await;
            return Err(RetrievalError::Api { status, message });
        }

        let body = response.text().await?;
        let decoded: SearchResponse =
            serde_json::from_str(&body).map_err(|e| RetrievalError::Decode(e.to_string()))?;

        tracing::debug!(
            provider = self.name(),
            count = decoded.results.len(),
            "search results received"
        );
        Ok(decoded.results)
    }
}
