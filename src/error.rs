use thiserror::Error;

// ─── Error hierarchy ────────────────────────────────────────────────────────

/// Structured error hierarchy for `DeepDraft`.
///
/// Each pipeline stage defines its own error enum. Library callers can match
/// on these to decide how to surface a failure; app-level glue continues to
/// use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum DeepDraftError {
    // ── Configuration ────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Snippet retrieval ────────────────────────────────────────────────
    #[error("retrieval: {0}")]
    Retrieval(#[from] RetrievalError),

    // ── Answer drafting ──────────────────────────────────────────────────
    #[error("drafting: {0}")]
    Drafting(#[from] DraftingError),

    // ── Anyhow fallthrough for app-level glue ───────────────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Configuration errors ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no API key for {provider}; set {env_var} or add it to config.toml")]
    MissingApiKey { provider: String, env_var: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("could not determine home directory")]
    NoHomeDir,
}

// ─── Retrieval errors (search provider) ─────────────────────────────────────

/// Any failure contacting or parsing the search provider. Retrieval that
/// succeeds with zero results is not an error; callers see `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("search response decode failed: {0}")]
    Decode(String),
}

// ─── Drafting errors (model provider) ───────────────────────────────────────

#[derive(Debug, Error)]
pub enum DraftingError {
    #[error("draft request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("draft response decode failed: {0}")]
    Decode(String),

    #[error("no completion returned by {model}")]
    EmptyCompletion { model: String },

    #[error("prompt render failed: {0}")]
    Template(#[from] tera::Error),
}

// ─── Crate-wide alias ───────────────────────────────────────────────────────

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DeepDraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_names_env_var() {
        let err = DeepDraftError::Config(ConfigError::MissingApiKey {
            provider: "tavily".into(),
            env_var: "TAVILY_API_KEY".into(),
        });
        assert!(err.to_string().contains("TAVILY_API_KEY"));
    }

    #[test]
    fn retrieval_api_error_displays_status() {
        let err = DeepDraftError::Retrieval(RetrievalError::Api {
            status: 429,
            message: "quota exceeded".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn empty_completion_names_model() {
        let err = DraftingError::EmptyCompletion {
            model: "llama3-70b-8192".into(),
        };
        assert!(err.to_string().contains("llama3-70b-8192"));
    }

    #[test]
    fn invalid_value_displays_field_and_reason() {
        let err = ConfigError::InvalidValue {
            field: "drafting.temperature".into(),
            reason: "must be between 0.0 and 1.0".into(),
        };
        assert!(err.to_string().contains("drafting.temperature"));
        assert!(err.to_string().contains("0.0 and 1.0"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let err: DeepDraftError = anyhow_err.into();
        assert!(err.to_string().contains("something went wrong"));
    }
}
