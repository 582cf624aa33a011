//! Server setup and initialization
//!
//! Provides the application builder, the server runner, and graceful shutdown.

use std::sync::Arc;

use axum::{middleware::from_fn, Router};
use presence_common::{AppConfig, AppError};
use presence_core::{SharedClock, SystemClock};
use presence_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config, json_error_body};
use crate::routes::{create_router, health_routes, route_not_found};
use crate::state::AppState;
use crate::sweeper::spawn_sweeper;

/// Build the complete Axum application with all routes and middleware
///
/// # Errors
/// Returns an error if the rate limiter configuration is rejected
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let timeout = config.http.request_timeout();

    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        timeout,
        config.app.env.is_production(),
    )?;
    let health = apply_middleware(health_routes(), timeout);

    Ok(api
        .merge(health)
        .fallback(route_not_found)
        .layer(from_fn(json_error_body))
        .with_state(state))
}

/// Create AppState backed by the system clock
pub fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    create_app_state_with_clock(config, Arc::new(SystemClock))
}

/// Create AppState with an explicit clock
pub fn create_app_state_with_clock(
    config: AppConfig,
    clock: SharedClock,
) -> Result<AppState, AppError> {
    let service_context = ServiceContextBuilder::new()
        .presence_config(&config.presence)
        .clock(clock)
        .build()?;

    info!(
        threshold_secs = config.presence.inactivity_threshold_secs,
        max_threshold_secs = config.presence.max_threshold_secs,
        "Presence registry initialized"
    );

    Ok(AppState::new(service_context, config))
}

/// Serve the application until a shutdown signal arrives
pub async fn run_server(listener: TcpListener, app: Router) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();
    let sweep_enabled = config.presence.sweep_enabled;
    let sweep_interval = config.presence.sweep_interval();

    let state = create_app_state(config)?;
    let sweeper = sweep_enabled.then(|| spawn_sweeper(state.shared_context(), sweep_interval));
    if sweeper.is_none() {
        warn!("Presence sweeper disabled; stale sessions are only removed on demand");
    }

    let app = create_app(state)?;

    info!("Starting HTTP server on {}", address);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind to {address}: {e}")))?;

    let result = run_server(listener, app).await;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    info!("Server stopped");

    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
