//! Canonical NANP keys and raw input normalization.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider test number. It fails the NANP pattern (its NXX starts with 1)
/// but is accepted so integration tests against the provider keep working.
pub const TEST_SENTINEL: &str = "5551234567";

/// NPA-NXX-XXXX as defined by the modern North American Numbering Plan.
static NANP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[2-9][0-8][0-9][2-9][0-9]{2}[0-9]{4}$").expect("NANP pattern is a valid regex")
});

/// Error returned when raw input cannot be turned into a [`CanonicalKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid NANP number '{original}' (digits after stripping: '{stripped}')")]
pub struct NormalizeError {
    original: String,
    stripped: String,
}

impl NormalizeError {
    /// The input exactly as it was received.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The digits left after stripping non-digits and the country code.
    pub fn stripped(&self) -> &str {
        &self.stripped
    }
}

/// A validated 10-digit NANP number, the sole identity used for cache and
/// provider lookups.
///
/// Instances only come out of [`normalize`], so every `CanonicalKey` either
/// matches the NANP pattern or is the [`TEST_SENTINEL`].
///
/// # Example
///
/// ```
/// use cnam_core::CanonicalKey;
///
/// let key: CanonicalKey = "1-212-555-0100".parse().unwrap();
/// assert_eq!(key.as_str(), "2125550100");
/// assert_eq!(key.npa(), "212");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numbering plan area (area code).
    pub fn npa(&self) -> &str {
        &self.0[..3]
    }

    /// Central office (exchange) code.
    pub fn nxx(&self) -> &str {
        &self.0[3..6]
    }

    /// Subscriber line number.
    pub fn line(&self) -> &str {
        &self.0[6..]
    }

    /// Returns true for the provider test number.
    pub fn is_test_sentinel(&self) -> bool {
        self.0 == TEST_SENTINEL
    }
}

/// Normalizes raw user input into a [`CanonicalKey`].
///
/// Every non-digit character is dropped, then leading `1`s (country code)
/// are stripped for as long as they are present. What remains must match
/// the NANP pattern or be the test sentinel.
///
/// # Examples
///
/// ```
/// use cnam_core::normalize;
///
/// assert_eq!(normalize("+15551234567").unwrap().as_str(), "5551234567");
/// assert!(normalize("555123456").is_err());
/// ```
pub fn normalize(raw: &str) -> Result<CanonicalKey, NormalizeError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let stripped = digits.trim_start_matches('1');

    if NANP_PATTERN.is_match(stripped) || stripped == TEST_SENTINEL {
        Ok(CanonicalKey(stripped.to_string()))
    } else {
        Err(NormalizeError {
            original: raw.to_string(),
            stripped: stripped.to_string(),
        })
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CanonicalKey {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s)
    }
}

impl TryFrom<String> for CanonicalKey {
    type Error = NormalizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize(&value)
    }
}

impl From<CanonicalKey> for String {
    fn from(key: CanonicalKey) -> Self {
        key.0
    }
}
