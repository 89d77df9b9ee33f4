//! Snippet retrieval from the web search provider.

mod snippet;
mod tavily;
mod traits;

pub use snippet::SearchSnippet;
pub use tavily::TavilyClient;
pub use traits::SearchProvider;
