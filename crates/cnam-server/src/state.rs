//! Application state.

use std::sync::Arc;

use cnam_cache::CacheStore;

use crate::pipeline::LookupPipeline;
use crate::provider::CnamProvider;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pipeline: LookupPipeline,
}

impl AppState {
    /// Creates a new AppState around the given pipeline.
    pub fn new(pipeline: LookupPipeline) -> Self {
        Self { pipeline }
    }

    /// Creates an AppState from a store and a provider.
    pub fn from_parts(store: Arc<CacheStore>, provider: Arc<dyn CnamProvider>) -> Self {
        Self::new(LookupPipeline::new(store, provider))
    }

    /// Returns the lookup pipeline.
    pub fn pipeline(&self) -> &LookupPipeline {
        &self.pipeline
    }

    /// Returns the cache store.
    pub fn store(&self) -> &CacheStore {
        self.pipeline.store().as_ref()
    }
}
