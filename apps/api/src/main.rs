mod config;
mod errors;
mod export;
mod listings;
mod llm_client;
mod models;
mod notify;
mod routes;
mod search;
mod session;
mod state;
mod summary;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::notify::SmtpMailer;
use crate::routes::build_router;
use crate::search::SerpApiClient;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobPulse v{}", env!("CARGO_PKG_VERSION"));

    let search = SerpApiClient::new(
        config.serp_api_base_url.clone(),
        config.serp_api_key.clone(),
    )?;
    info!("Job search client initialized ({})", config.serp_api_base_url);

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let mailer = SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        config.email_address.clone(),
        config.email_password.clone(),
    )?;
    info!("SMTP relay {}:{}", config.smtp_host, config.smtp_port);

    let state = AppState {
        config: config.clone(),
        search: Arc::new(search),
        llm: Arc::new(llm),
        mailer: Arc::new(mailer),
        sessions: SessionStore::default(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
