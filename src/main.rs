// src/main.rs
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get},
    Router,
};
use prometheus::Registry;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use route_metrics::config::Config;
use route_metrics::middleware::logging::request_logger;
use route_metrics::{track_requests, RequestMetrics};

mod handlers;

use handlers::demo::{cancel_order, get_user, list_orders};
use handlers::health::{health_check, metrics_endpoint};

/// Main entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let cfg = Config::from_env()?;

    // Initialize tracing subscriber with env filter
    tracing_subscriber::registry()
        .with(EnvFilter::new(&cfg.logging.level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Server starting...");
    tracing::info!(?cfg, "⚙️ Loaded configuration");

    // One registry for the whole process; a duplicate service aborts startup
    let registry = Registry::new();
    let request_metrics = RequestMetrics::new(&registry, cfg.metrics.clone())?;

    // Build application router
    let app = Router::new()
        .route("/users/{id}", get(get_user))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", delete(cancel_order))
        .route("/healthz", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .with_state(registry)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(from_fn(request_logger))
                .layer(from_fn_with_state(request_metrics, track_requests)),
        );

    // Server address
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
    tracing::info!(%addr, "🌐 Server running");

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    tracing::info!("⚡ Shutdown signal received");
}
