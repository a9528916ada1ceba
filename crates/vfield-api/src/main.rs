//! # vfield-api: Binary Entry Point
//!
//! Starts the Axum HTTP server hosting the demonstration fields.
//! Binds to a configurable port (`PORT`, default 8080).

use vfield_api::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let registry = vfield_core::demo::registry().map_err(|e| {
        tracing::error!("Schema construction failed: {e}");
        e
    })?;
    tracing::info!(fields = registry.len(), "field registry built");

    let port = config.port;
    let app = vfield_api::app(AppState::new(registry, config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("vfield API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
