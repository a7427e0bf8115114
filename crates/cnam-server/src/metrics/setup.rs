//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Buckets para histogramas (en segundos), de 100us a 10s.
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Inicializa el sistema de metricas y retorna el handle para el endpoint.
///
/// Instala el recorder global; solo puede llamarse una vez por proceso.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)?
        .install_recorder()?;

    super::cache::register_cache_metrics();
    super::http::register_http_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}

/// Crea un handle sin instalar el recorder global (tests, routers embebidos).
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
