use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use healthbot_utils::{init_logging, AppConfig};
use healthbot_web::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default().with_env_api_key()
    });

    init_logging(&config.logging)?;
    info!("Starting HealthBot web service");

    config.validate().context("Invalid configuration")?;

    let state = AppState::new(config.clone())
        .await
        .context("Failed to initialize application state")?;
    info!(
        data_dir = %config.storage.data_dir.display(),
        documents = state.storage.documents.len().await,
        "Storage ready"
    );

    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = TcpListener::bind(&addr).await?;
    info!("HealthBot listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
