//! ROSTER API Server Entry Point
//!
//! Bootstraps configuration, opens the user store, optionally runs the load
//! pipeline once, and starts the Axum HTTP server.

use std::sync::Arc;

use axum::extract::Request;
use axum::ServiceExt;
use roster_api::telemetry::{init_tracing, TelemetryConfig};
use roster_api::{create_api_service, load_users, ApiConfig, ApiError, ApiResult, AppState};
use roster_source::{HttpSource, SourceConfig};
use roster_storage::StoreConfig;

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing(&TelemetryConfig::default())?;

    let api_config = ApiConfig::from_env()?;
    let store = StoreConfig::from_env().open()?;
    let source = Arc::new(HttpSource::new(SourceConfig::from_env())?);

    let state = AppState::new(store, source, api_config.cache_config());

    if api_config.load_on_startup {
        // A failed boot load is logged; the server still starts.
        if let Err(e) = load_users(state.source.as_ref(), state.store.as_ref()).await {
            tracing::error!(error = %e, "Initial user load failed");
        }
    }

    let app = create_api_service(state, &api_config);

    let addr = api_config.bind_addr()?;
    tracing::info!(%addr, "Starting ROSTER API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
