//! CNAM provider abstraction.
//!
//! The provider is the source of truth the cache sits in front of. Any
//! failure it reports is classified as a [`ProviderError`]; callers are
//! expected to fall back to the unknown result rather than fail.

mod error;
mod http;

use async_trait::async_trait;
use cnam_core::{CanonicalKey, LookupResult};

pub use error::ProviderError;
pub use http::{HttpProvider, ProviderConfig};

/// A remote caller-name lookup service.
///
/// # Implementors
///
/// - `HttpProvider` - OpenCNAM-style REST API over reqwest
#[async_trait]
pub trait CnamProvider: Send + Sync {
    /// Looks up `key`, tagging the outbound request with `correlation_id`.
    async fn lookup(
        &self,
        key: &CanonicalKey,
        correlation_id: &str,
    ) -> Result<LookupResult, ProviderError>;

    /// Returns the name of this provider, for logging.
    fn name(&self) -> &str;
}
