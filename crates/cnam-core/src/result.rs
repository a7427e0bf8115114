//! Caller-name lookup results.

use serde::{Deserialize, Deserializer, Serialize};

use crate::key::{CanonicalKey, normalize};

/// Name reported when the caller could not be identified.
pub const UNKNOWN_NAME: &str = "UNKNOWN";

/// Caller identification data for a single number.
///
/// This struct maps to the JSON body returned by the CNAM provider, which is
/// also the body this proxy returns to its own callers and the payload it
/// stores in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Caller name as reported by the provider.
    pub name: String,

    /// The number the result belongs to.
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<CanonicalKey>,

    /// Price charged by the provider for the lookup.
    #[serde(default)]
    pub price: f64,

    /// Provider resource URI, if any.
    #[serde(default)]
    pub uri: Option<String>,
}

impl LookupResult {
    /// Creates a result with no price and no URI.
    pub fn new(name: impl Into<String>, number: Option<CanonicalKey>) -> Self {
        Self {
            name: name.into(),
            number,
            price: 0.0,
            uri: None,
        }
    }

    /// The default result used whenever nothing better is available.
    ///
    /// # Example
    ///
    /// ```
    /// use cnam_core::{LookupResult, normalize};
    ///
    /// let key = normalize("5551234567").unwrap();
    /// let result = LookupResult::unknown(&key);
    /// assert_eq!(result.name, "UNKNOWN");
    /// assert_eq!(result.number, Some(key));
    /// ```
    pub fn unknown(number: &CanonicalKey) -> Self {
        Self::new(UNKNOWN_NAME, Some(number.clone()))
    }

    /// Returns true if the name is empty or `unknown` in any casing.
    ///
    /// Such results are not reliable enough to be reused from the cache.
    pub fn is_unknown(&self) -> bool {
        self.name.is_empty() || self.name.eq_ignore_ascii_case(UNKNOWN_NAME)
    }
}

/// Providers format numbers their own way (`+15551234567`); anything that
/// does not normalize is dropped instead of failing the whole result.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<CanonicalKey>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| normalize(&value).ok()))
}
