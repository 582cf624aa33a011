//! Presence API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p presence-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use presence_common::{try_init_tracing_with_config, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Tracing preset follows APP_ENV; the full config is loaded afterwards
    let env = std::env::var("APP_ENV")
        .ok()
        .and_then(|raw| raw.parse::<Environment>().ok())
        .unwrap_or_default();

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Presence API Server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        threshold_secs = config.presence.inactivity_threshold_secs,
        "Configuration loaded"
    );

    presence_api::run(config).await.map_err(|e| {
        error!(error = %e, code = e.error_code(), "Server exited with error");
        e
    })?;

    Ok(())
}
