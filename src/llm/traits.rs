use crate::error::DraftingError;
use async_trait::async_trait;

/// Seam over the hosted model provider used for drafting.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider identifier (e.g. "groq").
    fn name(&self) -> &str;

    /// Model identifier completions are issued against.
    fn model(&self) -> &str;

    /// Send the filled prompt as a single user message and return the
    /// generated text, unmodified.
    async fn complete(&self, prompt: &str) -> Result<String, DraftingError>;
}
