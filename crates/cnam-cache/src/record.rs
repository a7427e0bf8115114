//! The persisted form of a cached lookup.

use chrono::{DateTime, Utc};
use cnam_core::{CanonicalKey, LookupResult};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Maximum size in bytes of the encoded result column.
pub const MAX_RESULT_LEN: usize = 2048;

/// A row of the `Cache` table.
///
/// Records are created once and never updated; they are only read, deleted
/// individually, or swept by age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheRecord {
    /// The NANP number, primary key.
    id: CanonicalKey,

    /// JSON-encoded [`LookupResult`].
    result: String,

    /// Set once when the record is created.
    created_at: DateTime<Utc>,
}

impl CacheRecord {
    /// Encodes a result into a new record stamped with the current time.
    pub fn new(id: CanonicalKey, result: &LookupResult) -> Result<Self, StoreError> {
        let encoded = serde_json::to_string(result)?;

        if encoded.len() > MAX_RESULT_LEN {
            return Err(StoreError::RecordTooLarge {
                key: id.to_string(),
                size: encoded.len(),
                max: MAX_RESULT_LEN,
            });
        }

        Ok(Self {
            id,
            result: encoded,
            created_at: Utc::now(),
        })
    }

    /// Overrides the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Returns the record key.
    pub fn id(&self) -> &CanonicalKey {
        &self.id
    }

    /// Returns when the record was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns true if the record was created strictly before `cutoff`.
    pub fn is_older_than(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }

    /// Decodes the stored result.
    pub fn decode(&self) -> Result<LookupResult, StoreError> {
        Ok(serde_json::from_str(&self.result)?)
    }
}
