//! Chat relay server.
//!
//! Exposes a single `POST /chat/` route that forwards the prompt text to
//! a hosted generation API and returns the model's reply.  The API key
//! is taken from the `GEMINI_API_KEY` environment variable; the process
//! refuses to start without it so a missing credential fails loudly at
//! boot instead of per-request.

use std::env;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use petrolytics_server::routes;
use petrolytics_server::state::{AppState, GenerationConfig};

/// Environment variable holding the generation API key.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Parser, Debug)]
#[command(version, about = "Chat relay for the analytics dashboard")]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Base URL of the generation API.
    #[arg(long, default_value = "https://generativelanguage.googleapis.com")]
    generation_url: String,

    /// Model identifier to request.
    #[arg(long, default_value = "gemini-2.5-flash")]
    model: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petrolytics_server=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let api_key = match env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => bail!("{API_KEY_ENV} must be set to a non-empty generation API key"),
    };

    let config = GenerationConfig {
        base_url: cli.generation_url,
        model: cli.model,
        api_key,
    };
    let state = AppState::shared(config)?;
    let app = routes::router(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;
    Ok(())
}
