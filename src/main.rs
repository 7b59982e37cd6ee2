// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::application::data_source::DataSource;
use crate::application::refresh::RefreshController;
use crate::infrastructure::config::{load_app_config, SourceSettings};
use crate::infrastructure::http_source::HttpDataSource;
use crate::infrastructure::mock_source::MockDataSource;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

fn build_source(settings: &SourceSettings) -> anyhow::Result<Arc<dyn DataSource>> {
    let source: Arc<dyn DataSource> = match settings {
        SourceSettings::Mock { latency_ms, outage } => {
            tracing::info!(latency_ms, outage, "Using synthetic data source");
            Arc::new(MockDataSource::new(Duration::from_millis(*latency_ms)).with_outage(*outage))
        }
        SourceSettings::Http {
            base_url,
            timeout_secs,
        } => {
            tracing::info!(%base_url, "Using HTTP telemetry backend");
            Arc::new(HttpDataSource::new(base_url, Duration::from_secs(*timeout_secs))?)
        }
    };
    Ok(source)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create data source (infrastructure layer)
    let source = build_source(&config.source)?;

    // Create services (application layer)
    let state = AppState::new(
        source,
        config.dashboard.initial_section,
        config.dashboard.page_size,
    );

    // Initial load; a failure here is not fatal, the timer retries
    if let Err(e) = state.dashboard.select(config.dashboard.initial_section).await {
        tracing::warn!(error = %e, "Initial section load failed");
    }

    let refresh = RefreshController::spawn(state.dashboard.clone(), config.dashboard.refresh_interval());

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr = config.server.bind;
    tracing::info!(%addr, "Starting netmon-dashboard service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    refresh.shutdown().await;
    tracing::info!("Shut down cleanly");

    Ok(())
}
