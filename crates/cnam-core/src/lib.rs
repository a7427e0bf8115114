//! CNAM Core - Domain types for the CNAM lookup proxy
//!
//! This crate provides the foundational types shared by the cache layer and
//! the HTTP server: the canonical NANP key, its normalizer, and the lookup
//! result returned to callers.
//!
//! # Example
//!
//! ```
//! use cnam_core::{LookupResult, normalize};
//!
//! let key = normalize("+1 (555) 123-4567").unwrap();
//! assert_eq!(key.as_str(), "5551234567");
//!
//! let fallback = LookupResult::unknown(&key);
//! assert!(fallback.is_unknown());
//! ```

pub mod key;
pub mod result;

pub use key::{CanonicalKey, NormalizeError, TEST_SENTINEL, normalize};
pub use result::{LookupResult, UNKNOWN_NAME};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
