//! Directory backend: one JSON document per cached number.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cnam_core::CanonicalKey;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use super::CacheBackend;
use crate::error::StoreError;
use crate::record::CacheRecord;

const RECORD_EXTENSION: &str = "json";

/// Backend that stores each record as `<dir>/<key>.json`.
///
/// Creates are atomic: the document is written to a temporary file and then
/// hard-linked into place, which fails if the target already exists. This
/// gives first-writer-wins semantics across tasks and processes sharing the
/// directory.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
    closed: AtomicBool,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`. No I/O is performed; see
    /// [`ensure_dir`](Self::ensure_dir).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates the cache directory if it does not exist.
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Returns the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &CanonicalKey) -> PathBuf {
        self.dir.join(format!("{key}.{RECORD_EXTENSION}"))
    }

    fn temp_path(&self, key: &CanonicalKey) -> PathBuf {
        self.dir.join(format!(".{key}.{}.tmp", Uuid::new_v4()))
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    async fn read_record(path: &Path) -> Result<Option<CacheRecord>, StoreError> {
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StoreError::corrupt(path, e.to_string()))
    }

    async fn discard_temp(temp: &Path) {
        match fs::remove_file(temp).await {
            Ok(()) => {},
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => debug!("Failed to remove temporary file {}: {}", temp.display(), e),
        }
    }

    fn is_record_file(path: &Path) -> bool {
        let visible = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| !name.starts_with('.'));

        visible && path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_EXTENSION)
    }
}

#[async_trait]
impl CacheBackend for FileBackend {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_open()?;

        match fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::unavailable(format!(
                "{} is not a directory",
                self.dir.display()
            ))),
            Err(e) => Err(StoreError::unavailable(format!(
                "{}: {}",
                self.dir.display(),
                e
            ))),
        }
    }

    async fn find(&self, key: &CanonicalKey) -> Result<Option<CacheRecord>, StoreError> {
        self.check_open()?;
        Self::read_record(&self.record_path(key)).await
    }

    async fn find_or_create(
        &self,
        record: CacheRecord,
    ) -> Result<(CacheRecord, bool), StoreError> {
        self.check_open()?;

        let path = self.record_path(record.id());
        let temp = self.temp_path(record.id());
        if let Err(e) = fs::write(&temp, serde_json::to_vec(&record)?).await {
            Self::discard_temp(&temp).await;
            return Err(e.into());
        }

        let outcome = match fs::hard_link(&temp, &path).await {
            Ok(()) => Ok((record, true)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                match Self::read_record(&path).await {
                    Ok(Some(existing)) => Ok((existing, false)),
                    Ok(None) => Err(StoreError::Conflict {
                        key: record.id().to_string(),
                    }),
                    Err(e) => Err(e),
                }
            },
            Err(e) => Err(e.into()),
        };

        Self::discard_temp(&temp).await;

        outcome
    }

    async fn destroy(&self, key: &CanonicalKey) -> Result<bool, StoreError> {
        self.check_open()?;

        match fs::remove_file(self.record_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn destroy_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        self.check_open()?;

        let mut entries = fs::read_dir(&self.dir).await?;
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !Self::is_record_file(&path) {
                continue;
            }

            let record = match Self::read_record(&path).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping unreadable cache record: {}", e);
                    continue;
                },
            };

            if !record.is_older_than(cutoff) {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {},
                Err(e) => return Err(e.into()),
            }
        }

        Ok(removed)
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}
