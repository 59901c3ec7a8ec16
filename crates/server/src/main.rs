//! HTTP server for the movie recommendation service.
//!
//! The listener comes up immediately; artifacts load in the background.
//! Until they are loaded every recommendation request gets a 503 and
//! `/health` reports `loading`.

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use server::api::{create_router, AppState};
use server::{Config, RecommendationOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;
    info!("Starting movie recommendation server with {:?}", config);

    let state = AppState::new();
    spawn_artifact_loading(state.clone(), &config);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Load the artifacts on a blocking thread and flip the state when done
fn spawn_artifact_loading(state: AppState, config: &Config) {
    let models_dir = config.models_dir.clone();
    let fan_out = config.fan_out;

    tokio::spawn(async move {
        let loaded = tokio::task::spawn_blocking(move || {
            RecommendationOrchestrator::load(&models_dir).map(|o| o.with_fan_out(fan_out))
        })
        .await;

        match loaded {
            Ok(Ok(orchestrator)) => {
                info!("Recommendation artifacts loaded successfully");
                state.set_ready(orchestrator).await;
            }
            Ok(Err(e)) => {
                error!("Failed to load recommendation artifacts: {}", e);
                state.set_failed(e.to_string()).await;
            }
            Err(e) => {
                error!("Artifact loading task panicked: {}", e);
                state.set_failed(e.to_string()).await;
            }
        }
    });
}
