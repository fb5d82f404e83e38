use std::net::SocketAddr;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_planner::cache::CacheConfig;
use transit_planner::dataset::load_from_path;
use transit_planner::planner::SearchConfig;
use transit_planner::web::{AppState, create_router};

/// Address to listen on when `TRANSIT_ADDR` is unset.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Ok(dataset_path) = std::env::var("TRANSIT_DATASET") else {
        error!("TRANSIT_DATASET not set; point it at a network JSON file");
        return ExitCode::FAILURE;
    };

    let dataset = match load_from_path(&dataset_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!(path = %dataset_path, error = %e, "failed to load dataset");
            return ExitCode::FAILURE;
        }
    };

    let addr_text = std::env::var("TRANSIT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = match addr_text.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(addr = %addr_text, error = %e, "invalid TRANSIT_ADDR");
            return ExitCode::FAILURE;
        }
    };

    // Build app state (computes the cost matrix up front)
    let state = AppState::new(dataset, SearchConfig::default(), &CacheConfig::default());
    info!(stops = state.costs.stop_count(), "cost matrix ready");

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!("Transit planner listening on http://{addr}");
    info!("  GET  /health          - Health check");
    info!("  GET  /stops           - List stops");
    info!("  POST /itinerary/plan  - Plan an itinerary");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
