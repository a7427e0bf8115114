//! Backing store abstraction.
//!
//! This module defines the trait every cache backend implements and ships
//! two implementations: an in-process store built on Moka and a directory
//! of JSON documents.

mod file;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cnam_core::CanonicalKey;

use crate::error::StoreError;
use crate::record::CacheRecord;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// A store of [`CacheRecord`]s keyed by [`CanonicalKey`].
///
/// Implementations report problems as errors and never decide policy; the
/// [`CacheStore`](crate::CacheStore) decides what an error means for the
/// request that triggered it.
///
/// # Implementors
///
/// - `MemoryBackend` - Moka-backed, process local
/// - `FileBackend` - One JSON document per key in a directory
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Lightweight reachability check used by the connection monitor.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Reads the record for `key`, if any.
    async fn find(&self, key: &CanonicalKey) -> Result<Option<CacheRecord>, StoreError>;

    /// Stores `record` unless a record with the same id already exists.
    ///
    /// Returns the record that ends up stored and whether it was created by
    /// this call. When two callers race, exactly one of them sees `true`.
    async fn find_or_create(&self, record: CacheRecord)
    -> Result<(CacheRecord, bool), StoreError>;

    /// Deletes the record for `key`. Returns whether a record existed.
    async fn destroy(&self, key: &CanonicalKey) -> Result<bool, StoreError>;

    /// Deletes every record created strictly before `cutoff`.
    async fn destroy_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Releases the connection. Later operations fail with
    /// [`StoreError::Closed`].
    async fn close(&self) -> Result<(), StoreError>;

    /// Returns the name of this backend, for logging.
    fn name(&self) -> &str;
}
