//! Cache and provider metrics recording.

use cnam_cache::{CacheLookup, WriteOutcome};
use metrics::counter;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!(
        "cnam_cache_lookups_total",
        "Cache lookups by outcome (hit, miss, skipped)"
    );
    metrics::describe_counter!(
        "cnam_cache_writes_total",
        "Cache writes by outcome (created, already_present, skipped_*, failed)"
    );
    metrics::describe_counter!(
        "cnam_cache_expired_total",
        "Total number of cache records removed by cleanup"
    );
    metrics::describe_counter!(
        "cnam_provider_lookups_total",
        "Provider lookups by outcome (ok or error kind)"
    );
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos para calcular el hit rate sin consultar el exporter.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    skipped: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            skipped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra el resultado de una lectura de cache
    pub fn record_lookup(&self, lookup: &CacheLookup) {
        let counter = match lookup {
            CacheLookup::Found(_) => &self.hits,
            CacheLookup::NotFound => &self.misses,
            CacheLookup::Skipped => &self.skipped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        counter!("cnam_cache_lookups_total", "outcome" => lookup.as_str()).increment(1);
    }

    /// Registra el resultado de una escritura
    pub fn record_write(&self, outcome: WriteOutcome) {
        counter!("cnam_cache_writes_total", "outcome" => outcome.as_str()).increment(1);
    }

    /// Registra entries eliminadas por cleanup
    pub fn record_expired(&self, count: u64) {
        counter!("cnam_cache_expired_total").increment(count);
    }

    /// Registra una consulta al provider
    pub fn record_provider(&self, outcome: &'static str) {
        counter!("cnam_provider_lookups_total", "outcome" => outcome).increment(1);
    }

    /// Calcula hit rate sobre las lecturas que llegaron al store
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let misses = self.misses() as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de lecturas saltadas por store caido
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}
