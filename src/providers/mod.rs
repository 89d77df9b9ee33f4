//! Plumbing shared by the search and model provider clients.

pub mod http;
pub mod scrub;

pub use http::build_provider_client;
pub use scrub::{api_failure, sanitize_api_error, scrub_secret_patterns};
