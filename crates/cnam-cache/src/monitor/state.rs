//! Shared backing store health state.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Instant;

use parking_lot::RwLock;

/// Last known reachability of the backing store.
///
/// Reads are a single atomic load and never wait on I/O. Starts unhealthy:
/// the store is only trusted once a probe has succeeded.
#[derive(Debug)]
pub struct HealthState {
    /// Whether the store answered the last probe.
    healthy: AtomicBool,
    /// The last probe time.
    last_probe: RwLock<Option<Instant>>,
    /// The last error message, if any.
    last_error: RwLock<Option<String>>,
    /// Number of consecutive failed probes.
    failure_count: AtomicU32,
    /// Set once the store is closed; never cleared.
    closed: AtomicBool,
}

impl HealthState {
    /// Creates a new, unhealthy, HealthState.
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(false),
            last_probe: RwLock::new(None),
            last_error: RwLock::new(None),
            failure_count: AtomicU32::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the last known health without blocking.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// Records a successful probe. Returns true if the store just came back.
    ///
    /// Has no effect on health once [`close`](Self::close) was called.
    pub(crate) fn record_success(&self) -> bool {
        *self.last_probe.write() = Some(Instant::now());
        *self.last_error.write() = None;
        self.failure_count.store(0, Ordering::Release);

        if self.is_closed() {
            return false;
        }

        let was_healthy = self.healthy.swap(true, Ordering::SeqCst);

        // close() may have run between the check and the swap
        if self.is_closed() {
            self.healthy.store(false, Ordering::SeqCst);
            return false;
        }

        !was_healthy
    }

    /// Records a failed probe. Returns true if the store just went away.
    pub(crate) fn record_failure(&self, error: impl Into<String>) -> bool {
        *self.last_probe.write() = Some(Instant::now());
        *self.last_error.write() = Some(error.into());
        self.failure_count.fetch_add(1, Ordering::AcqRel);

        self.healthy.swap(false, Ordering::SeqCst)
    }

    /// Marks the store unhealthy without a probe. Returns true if it was
    /// healthy before.
    pub(crate) fn force_unhealthy(&self) -> bool {
        self.healthy.swap(false, Ordering::SeqCst)
    }

    /// Marks the store unhealthy for good. Returns true if it was healthy
    /// before.
    pub(crate) fn close(&self) -> bool {
        self.closed.store(true, Ordering::SeqCst);
        self.healthy.swap(false, Ordering::SeqCst)
    }

    /// Returns true once the store has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Returns when the store was last probed.
    pub fn last_probe(&self) -> Option<Instant> {
        *self.last_probe.read()
    }

    /// Returns the last probe error.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Returns the number of consecutive failed probes.
    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::Acquire)
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}
