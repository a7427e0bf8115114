//! Lookup pipeline: cache, provider, response, cache write.
//!
//! A full lookup moves through these steps, in this order:
//!
//! 1. read the cache; a hit is returned as is and never re-cached,
//! 2. on a miss (or a skipped read) ask the provider, substituting the
//!    unknown result if it fails,
//! 3. hand the result back to the caller,
//! 4. write the provider result to the cache from a detached task.
//!
//! Step 4 never delays or changes the response. Its outcome only reaches
//! the log and the metrics.

use std::sync::Arc;

use cnam_cache::{CacheLookup, CacheStore, WriteOutcome};
use cnam_core::{CanonicalKey, LookupResult};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use crate::metrics::CacheMetrics;
use crate::provider::CnamProvider;

/// Where the result handed to the caller came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    /// Read from the cache.
    Cache,
    /// Returned by the provider.
    Provider,
    /// The unknown result, used when nothing else was available.
    Fallback,
}

/// A cache write scheduled after a provider lookup.
#[must_use = "a pending write does nothing until spawned or run"]
pub struct PendingWrite {
    store: Arc<CacheStore>,
    metrics: CacheMetrics,
    key: CanonicalKey,
    result: LookupResult,
}

impl PendingWrite {
    /// Returns the key that will be written.
    pub fn key(&self) -> &CanonicalKey {
        &self.key
    }

    /// Performs the write on the current task.
    pub async fn run(self) -> WriteOutcome {
        let outcome = self.store.write(&self.key, &self.result).await;
        self.metrics.record_write(outcome);
        outcome
    }

    /// Performs the write on a detached task.
    ///
    /// The handle may be dropped; the write still completes unless the
    /// runtime shuts down first.
    pub fn spawn(self) -> JoinHandle<WriteOutcome> {
        let span = tracing::info_span!("cache_write", key = %self.key);
        tokio::spawn(self.run().instrument(span))
    }
}

/// The result of a pipeline run.
pub struct LookupOutcome {
    result: LookupResult,
    source: ResultSource,
    pending_write: Option<PendingWrite>,
}

impl LookupOutcome {
    /// Returns the result to hand to the caller.
    pub fn result(&self) -> &LookupResult {
        &self.result
    }

    /// Returns where the result came from.
    pub fn source(&self) -> ResultSource {
        self.source
    }

    /// Returns true if a cache write follows the response.
    pub fn has_pending_write(&self) -> bool {
        self.pending_write.is_some()
    }

    /// Splits the outcome into the response payload and the follow-up
    /// write, if any.
    pub fn into_parts(self) -> (LookupResult, Option<PendingWrite>) {
        (self.result, self.pending_write)
    }
}

/// Orchestrates cache and provider for a single number.
///
/// Never fails: every downstream problem ends in some [`LookupResult`].
#[derive(Clone)]
pub struct LookupPipeline {
    store: Arc<CacheStore>,
    provider: Arc<dyn CnamProvider>,
    metrics: CacheMetrics,
}

impl LookupPipeline {
    /// Creates a pipeline over `store` and `provider`.
    pub fn new(store: Arc<CacheStore>, provider: Arc<dyn CnamProvider>) -> Self {
        Self {
            store,
            provider,
            metrics: CacheMetrics::new(),
        }
    }

    /// Returns the cache store.
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Returns the metrics recorder.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Full lookup: cache first, provider on a miss, then a cache write.
    pub async fn lookup(&self, key: &CanonicalKey, correlation_id: &str) -> LookupOutcome {
        if let CacheLookup::Found(result) = self.cache_lookup(key).await {
            return LookupOutcome {
                result,
                source: ResultSource::Cache,
                pending_write: None,
            };
        }

        self.lookup_provider(key, correlation_id).await
    }

    /// Cache-only lookup. Anything but a hit yields the unknown result.
    pub async fn lookup_cached(&self, key: &CanonicalKey) -> LookupOutcome {
        let (result, source) = match self.cache_lookup(key).await {
            CacheLookup::Found(result) => (result, ResultSource::Cache),
            CacheLookup::NotFound | CacheLookup::Skipped => {
                (LookupResult::unknown(key), ResultSource::Fallback)
            },
        };

        LookupOutcome {
            result,
            source,
            pending_write: None,
        }
    }

    /// Provider-only lookup. The cache is not read but the result is still
    /// offered to it afterwards.
    pub async fn lookup_provider(&self, key: &CanonicalKey, correlation_id: &str) -> LookupOutcome {
        let (result, source) = self.provider_lookup(key, correlation_id).await;

        let pending_write = PendingWrite {
            store: Arc::clone(&self.store),
            metrics: self.metrics.clone(),
            key: key.clone(),
            result: result.clone(),
        };

        LookupOutcome {
            result,
            source,
            pending_write: Some(pending_write),
        }
    }

    /// Reads the cache and records the outcome.
    pub async fn cache_lookup(&self, key: &CanonicalKey) -> CacheLookup {
        let lookup = self.store.lookup(key).await;
        self.metrics.record_lookup(&lookup);
        debug!(key = %key, outcome = lookup.as_str(), "Cache checked");
        lookup
    }

    /// Asks the provider, substituting the unknown result on failure.
    pub async fn provider_lookup(
        &self,
        key: &CanonicalKey,
        correlation_id: &str,
    ) -> (LookupResult, ResultSource) {
        match self.provider.lookup(key, correlation_id).await {
            Ok(result) => {
                self.metrics.record_provider("ok");
                info!(key = %key, provider = self.provider.name(), name = %result.name, "Provider lookup succeeded");
                (result, ResultSource::Provider)
            },
            Err(e) => {
                self.metrics.record_provider(e.kind());
                warn!(
                    key = %key,
                    provider = self.provider.name(),
                    status = ?e.status(),
                    error = %e,
                    "Provider lookup failed, using default result"
                );
                (LookupResult::unknown(key), ResultSource::Fallback)
            },
        }
    }
}
