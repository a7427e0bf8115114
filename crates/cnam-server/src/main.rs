//! CNAM lookup proxy binary.

use std::sync::Arc;

use anyhow::Context;
use cnam_cache::CacheStore;
use cnam_server::metrics::init_metrics;
use cnam_server::{AppState, HttpProvider, Settings, run_server_with_state};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&settings.logging.level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = settings.socket_addr()?;

    tracing::info!("Starting CNAM lookup proxy v{}", env!("CARGO_PKG_VERSION"));

    let prometheus_handle = init_metrics().context("Failed to initialize metrics")?;

    // Build the cache store; an unreachable store does not prevent serving
    let backend = settings.store.build_backend().await;
    let store = Arc::new(
        CacheStore::connect(backend, settings.monitor.to_config())
            .with_default_expire(settings.cache.default_expire),
    );
    let monitor = Arc::clone(store.monitor()).start();

    tracing::info!(
        backend = store.backend_name(),
        default_expire = ?settings.cache.default_expire,
        "Cache store initialized"
    );

    let provider = HttpProvider::new(settings.provider.clone())
        .context("Failed to build CNAM provider client")?;
    tracing::info!(base_url = %settings.provider.base_url, "CNAM provider configured");

    let state = AppState::from_parts(Arc::clone(&store), Arc::new(provider));

    let served = run_server_with_state(addr, state, prometheus_handle).await;

    monitor.stop();
    store.close().await;

    served.context("Server error")?;
    Ok(())
}
