//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

/// Where and how to reach the generation API.
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    /// Base URL, without a trailing slash.
    pub base_url: String,
    /// Model identifier, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// API key sent with every request.
    pub api_key: String,
}

/// State shared by all request handlers.
pub struct AppState {
    pub http: reqwest::Client,
    pub generation: GenerationConfig,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Builds the shared state with a long-timeout HTTP client; model
    /// responses can take a while for large prompts.
    pub fn shared(generation: GenerationConfig) -> anyhow::Result<SharedState> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Arc::new(AppState { http, generation }))
    }
}
