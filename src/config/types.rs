use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where config.toml lives on disk. Filled at load time, never serialized.
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub drafting: DraftingConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

// ─── Search (snippet retrieval) ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    /// Default number of snippets per run; per-run flags clamp to the same bounds.
    #[serde(default = "default_max_results")]
    pub max_results: u8,
    #[serde(default)]
    pub depth: SearchDepth,
}

fn default_search_base_url() -> String {
    "https://api.tavily.com".into()
}

fn default_max_results() -> u8 {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_search_base_url(),
            max_results: default_max_results(),
            depth: SearchDepth::default(),
        }
    }
}

impl SearchConfig {
    pub const MIN_RESULTS: u8 = 3;
    pub const MAX_RESULTS: u8 = 10;

    /// Clamp a requested snippet count into the supported range.
    pub fn clamp_results(requested: u8) -> u8 {
        requested.clamp(Self::MIN_RESULTS, Self::MAX_RESULTS)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

// ─── Drafting (model provider) ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftingConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_drafting_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Draft creativity knob shown to the user. Recorded on each run but the
    /// upstream call is currently issued at temperature 0 regardless.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_drafting_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}

fn default_model() -> String {
    "llama3-70b-8192".into()
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_drafting_base_url(),
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl DraftingConfig {
    pub const MIN_TEMPERATURE: f32 = 0.0;
    pub const MAX_TEMPERATURE: f32 = 1.0;

    /// Clamp a requested temperature into the supported range.
    pub fn clamp_temperature(requested: f32) -> f32 {
        requested.clamp(Self::MIN_TEMPERATURE, Self::MAX_TEMPERATURE)
    }
}

// ─── Gateway ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_host")]
    pub host: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    #[serde(default)]
    pub allow_public_bind: bool,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    7171
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            allow_public_bind: false,
            cors_origins: Vec::new(),
        }
    }
}

// ─── Validation and key resolution ──────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            search: SearchConfig::default(),
            drafting: DraftingConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url("search.base_url", &self.search.base_url)?;
        validate_base_url("drafting.base_url", &self.drafting.base_url)?;

        if !(SearchConfig::MIN_RESULTS..=SearchConfig::MAX_RESULTS)
            .contains(&self.search.max_results)
        {
            return Err(ConfigError::InvalidValue {
                field: "search.max_results".into(),
                reason: format!(
                    "must be between {} and {}",
                    SearchConfig::MIN_RESULTS,
                    SearchConfig::MAX_RESULTS
                ),
            });
        }

        if !(DraftingConfig::MIN_TEMPERATURE..=DraftingConfig::MAX_TEMPERATURE)
            .contains(&self.drafting.temperature)
        {
            return Err(ConfigError::InvalidValue {
                field: "drafting.temperature".into(),
                reason: "must be between 0.0 and 1.0".into(),
            });
        }

        Ok(())
    }

    /// Search provider key, or an error naming the env var to set.
    pub fn require_search_key(&self) -> Result<&str, ConfigError> {
        require_key(self.search.api_key.as_deref(), "tavily", "TAVILY_API_KEY")
    }

    /// Model provider key, or an error naming the env var to set.
    pub fn require_drafting_key(&self) -> Result<&str, ConfigError> {
        require_key(self.drafting.api_key.as_deref(), "groq", "GROQ_API_KEY")
    }

    /// Returns `true` when the config is a fresh default with no credentials
    /// from either the config file or the environment.
    pub fn needs_setup(&self) -> bool {
        self.search.api_key.is_none() && self.drafting.api_key.is_none()
    }
}

fn require_key<'a>(
    key: Option<&'a str>,
    provider: &str,
    env_var: &str,
) -> Result<&'a str, ConfigError> {
    match key {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ConfigError::MissingApiKey {
            provider: provider.into(),
            env_var: env_var.into(),
        }),
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field: field.into(),
        reason: e.to_string(),
    })?;
    Ok(())
}
