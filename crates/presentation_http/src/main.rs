//! Simulation cache HTTP server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::SimulationService;
use infrastructure::{
    AppConfig, FileContentStore, GeminiInferenceAdapter, SqliteSimulationStore, create_pool,
    init_logging,
};
use presentation_http::{AppState, create_router, set_expose_internal_errors};
use tokio::{net::TcpListener, signal, sync::watch};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.server).context("failed to initialize logging")?;

    info!("HTML Simulator v{} starting...", env!("CARGO_PKG_VERSION"));

    config.require_api_key()?;
    set_expose_internal_errors(config.expose_internal_errors());

    info!(
        environment = ?config.environment,
        host = %config.server.host,
        port = config.server.port,
        model = %config.inference.model,
        database = %config.database.path,
        content_dir = %config.content.directory,
        "Configuration loaded"
    );

    let pool = create_pool(&config.database).context("failed to open database")?;
    let store = SqliteSimulationStore::new(Arc::new(pool));
    let content = FileContentStore::open(&config.content).await?;
    let inference = GeminiInferenceAdapter::new(config.inference.clone())?;

    let service = SimulationService::new(Arc::new(store), Arc::new(content), Arc::new(inference));
    let app = create_router(AppState::new(service))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.allowed_origins));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });
    let drain_deadline = async move {
        if shutdown_rx.wait_for(|stopping| *stopping).await.is_ok() {
            info!("Waiting up to {:?} for connections to close...", shutdown_timeout);
            tokio::time::sleep(shutdown_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = async { server.await } => result?,
        () = drain_deadline => warn!("Shutdown timeout elapsed, dropping open connections"),
    }

    info!("Server shutdown complete");

    Ok(())
}

/// Allow any origin unless origins are configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    use axum::http::{HeaderValue, Method};
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
