use super::{Config, DraftingConfig, SearchConfig, SearchDepth};

impl Config {
    /// Environment variables take precedence over config.toml. Prefixed names
    /// win over the providers' conventional ones; malformed numeric values
    /// are ignored and the file value kept.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) =
            std::env::var("DEEPDRAFT_TAVILY_API_KEY").or_else(|_| std::env::var("TAVILY_API_KEY"))
            && !key.is_empty()
        {
            self.search.api_key = Some(key);
        }

        if let Ok(key) =
            std::env::var("DEEPDRAFT_GROQ_API_KEY").or_else(|_| std::env::var("GROQ_API_KEY"))
            && !key.is_empty()
        {
            self.drafting.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("DEEPDRAFT_MODEL")
            && !model.is_empty()
        {
            self.drafting.model = model;
        }

        if let Ok(base_url) = std::env::var("DEEPDRAFT_SEARCH_URL")
            && !base_url.is_empty()
        {
            self.search.base_url = base_url;
        }

        if let Ok(base_url) = std::env::var("DEEPDRAFT_DRAFT_URL")
            && !base_url.is_empty()
        {
            self.drafting.base_url = base_url;
        }

        if let Ok(depth_str) = std::env::var("DEEPDRAFT_SEARCH_DEPTH")
            && let Ok(depth) = depth_str.parse::<SearchDepth>()
        {
            self.search.depth = depth;
        }

        if let Ok(count_str) = std::env::var("DEEPDRAFT_MAX_RESULTS")
            && let Ok(count) = count_str.parse::<u8>()
            && (SearchConfig::MIN_RESULTS..=SearchConfig::MAX_RESULTS).contains(&count)
        {
            self.search.max_results = count;
        }

        if let Ok(temp_str) = std::env::var("DEEPDRAFT_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f32>()
            && (DraftingConfig::MIN_TEMPERATURE..=DraftingConfig::MAX_TEMPERATURE).contains(&temp)
        {
            self.drafting.temperature = temp;
        }

        if let Ok(port_str) =
            std::env::var("DEEPDRAFT_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) = std::env::var("DEEPDRAFT_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }
    }
}
