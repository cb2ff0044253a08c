//! Payroll engine HTTP server.
//!
//! Loads configuration from `PAYROLL_CONFIG_DIR` (default `./config`), seeds
//! an in-memory store and serves the API.

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_logger(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::from_env()?;
    let server = &config.service().server;
    init_logger(&server.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Payroll engine starting");

    let state = AppState::seeded(config.seed())?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&server.bind_address).await?;
    info!(address = %server.bind_address, "Listening");
    axum::serve(listener, router).await?;

    Ok(())
}
