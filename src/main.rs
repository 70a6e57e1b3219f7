use anyhow::Context;

use quill_api_rust::config::AppConfig;
use quill_api_rust::{app, logging, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, CLOUDINARY_*, etc.
    let _ = dotenvy::dotenv();
    logging::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Quill API in {:?} mode", config.environment);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::from_config(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Quill API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
