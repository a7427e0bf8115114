//! Background connection monitor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{info, warn};

use super::HealthState;
use crate::backend::CacheBackend;
use crate::error::StoreError;

/// Configuration for the connection monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Interval between probes.
    pub interval: Duration,
    /// How long a single probe may take before it counts as a failure.
    pub probe_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

/// Handle for controlling a running monitor.
pub struct MonitorHandle {
    /// Sender to signal shutdown.
    shutdown_tx: watch::Sender<bool>,
}

impl MonitorHandle {
    /// Signals the monitor to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Tracks whether the backing store is reachable.
///
/// The monitor is the only component that probes the store. Cache
/// operations read the resulting [`HealthState`] and never wait for a probe,
/// so a dead store costs requests nothing but a skipped cache.
pub struct ConnectionMonitor {
    /// The store being watched.
    backend: Arc<dyn CacheBackend>,
    /// The shared health flag.
    state: Arc<HealthState>,
    /// Configuration.
    config: MonitorConfig,
}

impl ConnectionMonitor {
    /// Creates a new monitor writing into `state`.
    pub fn new(
        backend: Arc<dyn CacheBackend>,
        state: Arc<HealthState>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            backend,
            state,
            config,
        }
    }

    /// Returns the last known health without blocking.
    pub fn is_healthy(&self) -> bool {
        self.state.is_healthy()
    }

    /// Returns the shared health state.
    pub fn state(&self) -> &Arc<HealthState> {
        &self.state
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Probes the store once and updates the health state.
    ///
    /// Only transitions are logged, so a store that stays down does not
    /// flood the log every interval.
    pub async fn probe(&self) -> bool {
        match self.ping().await {
            Ok(()) => {
                if self.state.record_success() {
                    info!(backend = self.backend.name(), "Cache store is online");
                }
                self.state.is_healthy()
            },
            Err(e) => {
                if self.state.record_failure(e.to_string()) {
                    warn!(
                        backend = self.backend.name(),
                        error = %e,
                        "Cache store is unreachable"
                    );
                }
                false
            },
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let limit = self.config.probe_timeout;
        match timeout(limit, self.backend.ping()).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                millis: limit.as_millis() as u64,
            }),
        }
    }

    /// Marks the store unhealthy immediately. The underlying connection is
    /// left alone.
    pub fn force_unhealthy(&self) {
        if self.state.force_unhealthy() {
            warn!(backend = self.backend.name(), "Cache store marked unhealthy");
        }
    }

    /// Marks the store permanently unhealthy. Probes still in flight can no
    /// longer bring it back.
    pub fn mark_closed(&self) {
        if self.state.close() {
            warn!(backend = self.backend.name(), "Cache store marked unhealthy");
        }
    }

    /// Starts the background probe task. The first probe runs immediately.
    ///
    /// Returns a handle that can be used to stop the monitor.
    pub fn start(self: Arc<Self>) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = MonitorHandle { shutdown_tx };

        tokio::spawn(self.run(shutdown_rx));

        handle
    }

    /// Runs the monitor loop.
    async fn run(self: Arc<Self>, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            backend = self.backend.name(),
            "Starting connection monitor with interval {:?}", self.config.interval
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.probe().await;
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!("Connection monitor shutting down");
                        break;
                    }
                }
            }
        }
    }
}
