//! HTTP handlers.

pub mod cache;
pub mod cleanup;
pub mod health;
pub mod lookup;
pub mod metrics;
pub mod response;
