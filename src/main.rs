// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{routing::{get, post}, Router};
use chrono::Utc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::signal_generator::SyntheticSource;
use crate::application::simulation_service::SimulationService;
use crate::application::ticker::Ticker;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::rng::StdRandom;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{force_event, health_check, index, snapshot, stream};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let settings = load_settings()?;
    tracing::info!(
        "Tick interval {}ms, history capacity {}, seed {:?}",
        settings.simulation.tick_interval_ms,
        settings.simulation.history_capacity,
        settings.simulation.seed
    );

    // Sample source and demo-event randomness (infrastructure layer)
    let seed = settings.simulation.seed;
    let source = SyntheticSource::new(StdRandom::from_seed_option(seed));
    let events = StdRandom::from_seed_option(seed.map(|s| s.wrapping_add(1)));

    // Create services (application layer)
    let dashboard = DashboardService::new(settings.server.title.clone(), settings.thresholds);
    let mut simulation = SimulationService::new(
        Box::new(source),
        Box::new(events),
        dashboard,
        &settings.simulation,
    );
    simulation.seed(Utc::now()).await?;
    let ticker = Ticker::spawn(simulation);

    // Create application state
    let state = Arc::new(AppState {
        ticker: ticker.client(),
        refresh: settings.simulation.tick_interval(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(index))
        .route("/healthz", get(health_check))
        .route("/api/snapshot", get(snapshot))
        .route("/api/stream", get(stream))
        .route("/api/events/:kind", post(force_event))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = settings.server.bind;
    tracing::info!("Starting water-quality-dashboard on {}", addr);

    // Stopping the ticker closes open event streams so the server can drain
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            ticker.stop().await;
        })
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
