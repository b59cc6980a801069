use std::sync::Arc;

use anyhow::Context;
use extractor::{GeminiClient, LangExtractor};
use storage::{ReportRepository, SessionRepository};

mod config;
mod error;
mod features;
mod openapi;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod views;

use config::Config;
use features::audit::services::{ExtractionInvoker, ReportRenderer};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting DocuTrace");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully");

    let api_key = config.api_key();
    if api_key.is_none() {
        tracing::warn!("No GEMINI_API_KEY or LANGEXTRACT_API_KEY set; audits will be refused");
    }

    let client = GeminiClient::new(&config.gemini_base_url, api_key.clone().unwrap_or_default())
        .context("Failed to build Gemini client")?;
    let engine = LangExtractor::new(client).with_max_char_buffer(config.max_char_buffer);
    tracing::info!(
        "Using Gemini at {} (chunk size {} bytes)",
        config.gemini_base_url,
        config.max_char_buffer
    );

    let state = AppState::new(
        ExtractionInvoker::new(Arc::new(engine), api_key),
        ReportRenderer::new(ReportRepository::current_dir()),
    )
    .with_sessions(SessionRepository::with_limits(
        config.max_sessions,
        config.session_ttl_secs,
    ));
    tracing::info!(
        "Keeping at most {} sessions, idle for up to {}s",
        config.max_sessions,
        config.session_ttl_secs
    );
    let app = routes::build_router(state, config.max_upload_bytes);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
