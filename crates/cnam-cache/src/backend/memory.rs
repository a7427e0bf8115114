//! In-process backend using Moka.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cnam_core::CanonicalKey;
use moka::future::Cache;

use super::CacheBackend;
use crate::error::StoreError;
use crate::record::CacheRecord;

/// Backend that keeps records in a Moka cache.
///
/// Records have no TTL here; age-based expiry is driven by
/// [`destroy_older_than`](CacheBackend::destroy_older_than). Reachability can
/// be toggled to simulate an outage.
pub struct MemoryBackend {
    inner: Cache<CanonicalKey, CacheRecord>,
    reachable: AtomicBool,
    closed: AtomicBool,
}

impl MemoryBackend {
    /// Creates an unbounded backend.
    pub fn new() -> Self {
        Self::from_cache(Cache::builder().build())
    }

    /// Creates a backend holding at most `max_capacity` records.
    ///
    /// Once full, Moka evicts the least used records, so records may go
    /// away without a sweep or delete.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self::from_cache(Cache::builder().max_capacity(max_capacity).build())
    }

    fn from_cache(inner: Cache<CanonicalKey, CacheRecord>) -> Self {
        Self {
            inner,
            reachable: AtomicBool::new(true),
            closed: AtomicBool::new(false),
        }
    }

    /// Marks the backend reachable or not. While unreachable every
    /// operation fails with [`StoreError::Unavailable`].
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Returns the number of records, after applying pending writes.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed);
        }
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("memory backend marked unreachable"));
        }
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn find(&self, key: &CanonicalKey) -> Result<Option<CacheRecord>, StoreError> {
        self.check()?;
        Ok(self.inner.get(key).await)
    }

    async fn find_or_create(
        &self,
        record: CacheRecord,
    ) -> Result<(CacheRecord, bool), StoreError> {
        self.check()?;

        // Moka runs at most one init future per key
        let entry = self
            .inner
            .entry(record.id().clone())
            .or_insert_with(async move { record })
            .await;

        let created = entry.is_fresh();
        Ok((entry.into_value(), created))
    }

    async fn destroy(&self, key: &CanonicalKey) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.inner.remove(key).await.is_some())
    }

    async fn destroy_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        self.check()?;

        let expired: Vec<_> = self
            .inner
            .iter()
            .filter(|(_, record)| record.is_older_than(cutoff))
            .map(|(key, _)| key)
            .collect();

        let mut removed = 0;
        for key in expired {
            if self.inner.remove(&*key).await.is_some() {
                removed += 1;
            }
        }

        Ok(removed)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
