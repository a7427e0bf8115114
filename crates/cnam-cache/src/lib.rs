//! # CNAM Cache
//!
//! Cache layer for the CNAM lookup proxy.
//!
//! This crate persists provider results keyed by canonical NANP number and
//! keeps serving requests when the backing store goes away.
//!
//! ## Features
//!
//! - Async trait-based backend abstraction (in-memory Moka, JSON files)
//! - Atomic find-or-create: concurrent writes for a key leave one record
//! - Background connection monitor with a non-blocking health read
//! - Degraded mode: reads, writes and sweeps skip the store while it is down
//! - Age-based expiry with a configurable default window
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cnam_cache::{CacheStore, MemoryBackend, MonitorConfig};
//!
//! let store = CacheStore::connect(Arc::new(MemoryBackend::new()), MonitorConfig::default());
//! let _handle = Arc::clone(store.monitor()).start();
//!
//! let key = cnam_core::normalize("+15551234567")?;
//! let cached = store.lookup(&key).await;
//! ```

pub mod backend;
pub mod error;
pub mod monitor;
pub mod record;
pub mod store;

// Re-exports
pub use backend::{CacheBackend, FileBackend, MemoryBackend};
pub use error::StoreError;
pub use monitor::{ConnectionMonitor, HealthState, MonitorConfig, MonitorHandle};
pub use record::{CacheRecord, MAX_RESULT_LEN};
pub use store::{CacheLookup, CacheStore, ExpireUnit, ExpireWindow, WriteOutcome};

// Re-export cnam_core for consumers
pub use cnam_core;
