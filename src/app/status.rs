use crate::config::Config;
use crate::ui::style;

fn key_state(key: Option<&str>) -> String {
    match key {
        Some(key) if !key.trim().is_empty() => style::success("✓ configured"),
        _ => style::yellow("✗ not set"),
    }
}

pub fn render_status(config: &Config) -> String {
    let lines = vec![
        format!("{} {}", style::accent("◆"), style::header("DeepDraft Status")),
        String::new(),
        format!("Version      {}", style::value(env!("CARGO_PKG_VERSION"))),
        format!("Config       {}", style::value(config.config_path.display())),
        String::new(),
        style::header("Search"),
        format!("  Endpoint     {}", style::value(&config.search.base_url)),
        format!("  Depth        {}", style::value(config.search.depth)),
        format!("  Max results  {}", style::value(config.search.max_results)),
        format!(
            "  API key      {}",
            key_state(config.search.api_key.as_deref())
        ),
        String::new(),
        style::header("Drafting"),
        format!("  Endpoint     {}", style::value(&config.drafting.base_url)),
        format!("  Model        {}", style::value(&config.drafting.model)),
        format!("  Temperature  {}", style::value(config.drafting.temperature)),
        format!(
            "  API key      {}",
            key_state(config.drafting.api_key.as_deref())
        ),
        String::new(),
        style::header("Gateway"),
        format!(
            "  Bind         {}",
            style::value(format!("{}:{}", config.gateway.host, config.gateway.port))
        ),
        format!(
            "  Public bind  {}",
            if config.gateway.allow_public_bind {
                style::yellow("allowed")
            } else {
                style::dim("refused")
            }
        ),
    ];

    lines.join("\n")
}
