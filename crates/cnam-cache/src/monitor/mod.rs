//! Backing store reachability tracking.
//!
//! This module provides the shared health flag read by every cache
//! operation and the background task that keeps it up to date.

mod scheduler;
mod state;

pub use scheduler::{ConnectionMonitor, MonitorConfig, MonitorHandle};
pub use state::HealthState;
