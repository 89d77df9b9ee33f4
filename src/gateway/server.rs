use super::handlers::{handle_download, handle_health, handle_history, handle_research};
use super::{AppState, MAX_BODY_SIZE, REQUEST_TIMEOUT_SECS, SESSION_HEADER};

use crate::config::Config;
use crate::pipeline::ResearchPipeline;
use crate::session::SessionRegistry;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, StatusCode},
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

/// True unless `host` is one of the loopback spellings.
pub(super) fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Bind `host:port` and serve the gateway until the process is stopped.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>) -> Result<()> {
    // ── Security: refuse public bind without explicit opt-in ──
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host} -- the gateway has no authentication and\n\
             would be exposed to the internet. Fix: use --host 127.0.0.1 (default),\n\
             or set [gateway] allow_public_bind = true in config.toml (NOT recommended)."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parse gateway address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind gateway listener")?;

    run_gateway_with_listener(host, listener, config).await
}

/// Serve the gateway on an already-bound listener, so callers can bind
/// port 0 and learn the real port before the first request lands.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
) -> Result<()> {
    let bound_port = listener
        .local_addr()
        .context("read gateway listener address")?
        .port();
    let display_addr = format!("{host}:{bound_port}");

    let pipeline = Arc::new(ResearchPipeline::from_config(&config)?);
    let state = AppState {
        config: Arc::clone(&config),
        pipeline,
        sessions: Arc::new(SessionRegistry::new()),
    };

    print_gateway_banner(&display_addr, &state);

    let app = build_app(state, &config.gateway.cors_origins);
    axum::serve(listener, app)
        .await
        .context("serve gateway")?;

    Ok(())
}

fn print_gateway_banner(display_addr: &str, state: &AppState) {
    println!("deepdraft gateway listening on {display_addr}");
    println!("  routes: GET /health, POST /research, GET /history, GET /download");
    println!("  model: {}", state.config.drafting.model);
    println!("  session header: {SESSION_HEADER} (minted when absent)");
}

fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    let mut app = Router::new()
        .route("/health", get(handle_health))
        .route("/research", post(handle_research))
        .route("/history", get(handle_history))
        .route("/download", get(handle_download))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ));

    if !cors_origins.is_empty() {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    HeaderName::from_static(SESSION_HEADER),
                ])
                .expose_headers([HeaderName::from_static(SESSION_HEADER)]),
        );
    }

    app
}
