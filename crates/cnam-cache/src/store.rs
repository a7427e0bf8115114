//! Health-gated cache store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use cnam_core::{CanonicalKey, LookupResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backend::CacheBackend;
use crate::monitor::{ConnectionMonitor, HealthState, MonitorConfig};
use crate::record::CacheRecord;

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// A cached result exists for the key.
    Found(LookupResult),
    /// The store answered and has nothing for the key, or failed.
    NotFound,
    /// The store is believed down and was not contacted.
    Skipped,
}

impl CacheLookup {
    /// Returns the cached result, if any.
    pub fn into_result(self) -> Option<LookupResult> {
        match self {
            Self::Found(result) => Some(result),
            Self::NotFound | Self::Skipped => None,
        }
    }

    /// Short label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Found(_) => "hit",
            Self::NotFound => "miss",
            Self::Skipped => "skipped",
        }
    }
}

/// Outcome of a cache write. Informational only: writes never fail from
/// the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A new record was stored.
    Created,
    /// A record already existed and was kept.
    AlreadyPresent,
    /// The store is believed down and was not contacted.
    SkippedUnhealthy,
    /// The result is unknown or empty and not worth caching.
    SkippedUnknown,
    /// The store reported an error; it was logged.
    Failed,
}

impl WriteOutcome {
    /// Short label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AlreadyPresent => "already_present",
            Self::SkippedUnhealthy => "skipped_unhealthy",
            Self::SkippedUnknown => "skipped_unknown",
            Self::Failed => "failed",
        }
    }
}

/// Time unit of an [`ExpireWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpireUnit {
    #[serde(alias = "second")]
    Seconds,
    #[serde(alias = "minute")]
    Minutes,
    #[serde(alias = "hour")]
    Hours,
    #[serde(alias = "day")]
    Days,
    #[serde(alias = "week")]
    Weeks,
}

/// Default age after which records are swept, as `{value, unit}`.
///
/// # Example
///
/// ```
/// use cnam_cache::{ExpireUnit, ExpireWindow};
///
/// let window = ExpireWindow::default();
/// assert_eq!(window.value, 1);
/// assert_eq!(window.unit, ExpireUnit::Days);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpireWindow {
    pub value: u32,
    pub unit: ExpireUnit,
}

impl ExpireWindow {
    /// Returns the window as a duration.
    pub fn duration(&self) -> TimeDelta {
        let value = i64::from(self.value);
        match self.unit {
            ExpireUnit::Seconds => TimeDelta::seconds(value),
            ExpireUnit::Minutes => TimeDelta::minutes(value),
            ExpireUnit::Hours => TimeDelta::hours(value),
            ExpireUnit::Days => TimeDelta::days(value),
            ExpireUnit::Weeks => TimeDelta::weeks(value),
        }
    }

    /// Returns `now` minus the window.
    pub fn cutoff_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.duration())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for ExpireWindow {
    fn default() -> Self {
        Self {
            value: 1,
            unit: ExpireUnit::Days,
        }
    }
}

/// The cache layer used by the lookup pipeline.
///
/// Every operation first reads the monitor's health flag and skips the
/// store entirely when it is down. Store errors are logged and degraded:
/// a failed read is a miss, a failed write or sweep is a no-op.
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    monitor: Arc<ConnectionMonitor>,
    default_expire: ExpireWindow,
    closed: AtomicBool,
}

impl CacheStore {
    /// Creates a store over `backend`, gated by `monitor`.
    pub fn new(backend: Arc<dyn CacheBackend>, monitor: Arc<ConnectionMonitor>) -> Self {
        Self {
            backend,
            monitor,
            default_expire: ExpireWindow::default(),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a store and a monitor for `backend` sharing a fresh
    /// [`HealthState`]. The monitor is not started.
    pub fn connect(backend: Arc<dyn CacheBackend>, config: MonitorConfig) -> Self {
        let monitor = ConnectionMonitor::new(
            Arc::clone(&backend),
            Arc::new(HealthState::new()),
            config,
        );
        Self::new(backend, Arc::new(monitor))
    }

    /// Sets the default expiry window.
    pub fn with_default_expire(mut self, window: ExpireWindow) -> Self {
        self.default_expire = window;
        self
    }

    /// Returns the monitor gating this store.
    pub fn monitor(&self) -> &Arc<ConnectionMonitor> {
        &self.monitor
    }

    /// Returns the last known health of the backing store.
    pub fn is_healthy(&self) -> bool {
        self.monitor.is_healthy()
    }

    /// Returns the backend name.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Returns the default expiry window.
    pub fn default_expire(&self) -> ExpireWindow {
        self.default_expire
    }

    /// Returns the cutoff used when a sweep does not name one.
    pub fn default_cutoff(&self) -> DateTime<Utc> {
        self.default_expire.cutoff_from(Utc::now())
    }

    /// Reads the cached result for `key`.
    pub async fn lookup(&self, key: &CanonicalKey) -> CacheLookup {
        if !self.is_healthy() {
            debug!(key = %key, "Cache store unhealthy, skipping lookup");
            return CacheLookup::Skipped;
        }

        let record = match self.backend.find(key).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!(key = %key, "Cached result not found");
                return CacheLookup::NotFound;
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Error reading from cache store");
                return CacheLookup::NotFound;
            },
        };

        match record.decode() {
            Ok(result) => {
                info!(key = %key, name = %result.name, "Using cached result");
                CacheLookup::Found(result)
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cached result could not be decoded");
                CacheLookup::NotFound
            },
        }
    }

    /// Stores `result` for `key` unless one is already stored.
    ///
    /// Unknown results and writes while the store is down are skipped.
    pub async fn write(&self, key: &CanonicalKey, result: &LookupResult) -> WriteOutcome {
        if !self.is_healthy() {
            debug!(key = %key, "Cache store unhealthy, skipping write");
            return WriteOutcome::SkippedUnhealthy;
        }

        if result.is_unknown() {
            debug!(key = %key, name = %result.name, "Not caching unknown result");
            return WriteOutcome::SkippedUnknown;
        }

        let record = match CacheRecord::new(key.clone(), result) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %key, error = %e, "Unable to cache result");
                return WriteOutcome::Failed;
            },
        };

        match self.backend.find_or_create(record).await {
            Ok((_, created)) => {
                info!(key = %key, was_created = created, "Cached lookup");
                if created {
                    WriteOutcome::Created
                } else {
                    WriteOutcome::AlreadyPresent
                }
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Unable to cache result");
                WriteOutcome::Failed
            },
        }
    }

    /// Deletes every record created before `older_than`. Returns the number
    /// of records removed, or 0 when the store is down or fails.
    pub async fn expire(&self, older_than: DateTime<Utc>) -> u64 {
        if !self.is_healthy() {
            debug!("Cache store unhealthy, skipping cleanup");
            return 0;
        }

        match self.backend.destroy_older_than(older_than).await {
            Ok(removed) => {
                info!(
                    expire_older_than = %older_than.to_rfc3339(),
                    expired_items = removed,
                    "Cleanup cache requested"
                );
                removed
            },
            Err(e) => {
                warn!(error = %e, "Cleanup cache failed");
                0
            },
        }
    }

    /// Deletes the record for `key`. Returns whether one was removed.
    pub async fn delete(&self, key: &CanonicalKey) -> bool {
        if !self.is_healthy() {
            debug!(key = %key, "Cache store unhealthy, skipping delete");
            return false;
        }

        match self.backend.destroy(key).await {
            Ok(deleted) => {
                info!(key = %key, deleted = deleted, "Cache entry deleted");
                deleted
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Unable to delete cache entry");
                false
            },
        }
    }

    /// Releases the backend and marks the store unhealthy.
    ///
    /// Calling this more than once is a no-op.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("Cache store already closed");
            return;
        }

        warn!(backend = self.backend.name(), "Cache store connections are being closed");
        self.monitor.mark_closed();

        match self.backend.close().await {
            Ok(()) => warn!(backend = self.backend.name(), "Cache store connections closed"),
            Err(e) => warn!(error = %e, "Cache store did not close cleanly"),
        }
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_window_durations() {
        let window = |value, unit| ExpireWindow { value, unit };

        assert_eq!(window(30, ExpireUnit::Seconds).duration(), TimeDelta::seconds(30));
        assert_eq!(window(5, ExpireUnit::Minutes).duration(), TimeDelta::minutes(5));
        assert_eq!(window(2, ExpireUnit::Hours).duration(), TimeDelta::hours(2));
        assert_eq!(window(1, ExpireUnit::Days).duration(), TimeDelta::days(1));
        assert_eq!(window(1, ExpireUnit::Weeks).duration(), TimeDelta::days(7));
    }

    #[test]
    fn test_expire_window_cutoff() {
        let now = Utc::now();
        let cutoff = ExpireWindow::default().cutoff_from(now);
        assert_eq!(now - cutoff, TimeDelta::days(1));
    }

    #[test]
    fn test_expire_window_deserializes_singular_and_plural() {
        let window: ExpireWindow =
            serde_json::from_str(r#"{"value": 3, "unit": "hours"}"#).unwrap();
        assert_eq!(window.unit, ExpireUnit::Hours);

        let window: ExpireWindow = serde_json::from_str(r#"{"value": 1, "unit": "day"}"#).unwrap();
        assert_eq!(window.unit, ExpireUnit::Days);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CacheLookup::Skipped.as_str(), "skipped");
        assert_eq!(CacheLookup::NotFound.into_result(), None);
        assert_eq!(WriteOutcome::AlreadyPresent.as_str(), "already_present");
    }
}
