//! CNAM Server - HTTP front end for the CNAM lookup proxy.
//!
//! Axum router, request extractors and middleware, the lookup pipeline
//! that sits between cache and provider, and the process settings.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod pipeline;
pub mod provider;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use pipeline::{LookupOutcome, LookupPipeline, PendingWrite, ResultSource};
pub use provider::{CnamProvider, HttpProvider, ProviderConfig, ProviderError};
pub use server::{create_router, run_server_with_state};
pub use settings::{Settings, SettingsError};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
