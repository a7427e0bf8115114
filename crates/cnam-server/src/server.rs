use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{delete, get},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;

use crate::handlers::{
    cache::{delete_cached, get_cached},
    cleanup::cleanup,
    health::health_check,
    lookup::{lookup, provider_lookup},
    metrics::metrics_handler,
};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Creates a router with the given application state and metrics handle.
pub fn create_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    // Static routes take precedence over the catch-all `/{number}`
    let app_router = Router::new()
        .route("/health", get(health_check))
        .route("/cleanup", delete(cleanup))
        .route("/cache/{number}", get(get_cached).delete(delete_cached))
        .route("/provider/{number}", get(provider_lookup))
        .route("/{number}", get(lookup))
        .with_state(state);

    Router::new()
        .merge(app_router)
        .merge(metrics_router)
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(middleware_stack)
}

/// Runs the server until a shutdown signal arrives.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
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
