mod args;
mod routes;

use args::{ServerArgs, ServerConfig};
use log::info;
use routes::AppState;
use std::sync::Arc;
use stock::{CompanyId, Dataset, QueryService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse_args(std::env::args().collect());
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.get_log_level()),
    )
    .init();
    info!("=== Starting Stock Price API ===");

    let config = ServerConfig::from(&args);

    // 1. Load the dataset once. A failed load leaves the service running without data.
    let dataset = Arc::new(Dataset::load(&config.data_file));
    let service = Arc::new(QueryService::new(dataset));
    info!("Available companies: {}", CompanyId::joined());

    // 2. Setup Routes
    let app = routes::router(AppState::new(service));

    let addr = config.bind_address();
    info!("Stock Price API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Stock Price API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
