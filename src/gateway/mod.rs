//! Axum-based HTTP gateway exposing the research pipeline over JSON.
//!
//! Routes:
//! - `GET /health` - liveness probe
//! - `POST /research` - run one query through retrieval and drafting
//! - `GET /history` - recent drafts for the caller's session, newest first
//! - `GET /download` - latest draft as a `text/plain` attachment
//!
//! Sessions are keyed by the [`SESSION_HEADER`] request header. The gateway
//! mints a fresh id when the header is absent or malformed and echoes the
//! resolved id on every response, so a client only has to store what it is
//! given.

mod handlers;
mod server;

pub use server::{run_gateway, run_gateway_with_listener};

use std::sync::Arc;

use crate::config::Config;
use crate::llm::OpenAiCompatibleClient;
use crate::pipeline::ResearchPipeline;
use crate::search::TavilyClient;
use crate::session::SessionRegistry;

/// Cap on request body bytes; larger payloads are rejected before parsing.
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout; a research run makes two upstream calls, so this is
/// generous compared to an ordinary API server.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Session id request/response header.
pub const SESSION_HEADER: &str = "x-deepdraft-session";

/// Shared state for all axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<ResearchPipeline<TavilyClient, OpenAiCompatibleClient>>,
    pub sessions: Arc<SessionRegistry>,
}

/// POST /research request body.
#[derive(serde::Deserialize, serde::Serialize)]
pub struct ResearchBody {
    pub query: String,
    /// Snippet count for this run; falls back to the configured default.
    #[serde(default)]
    pub max_results: Option<u8>,
    /// Creativity knob recorded on this run; falls back to the configured
    /// default.
    #[serde(default)]
    pub temperature: Option<f32>,
}
