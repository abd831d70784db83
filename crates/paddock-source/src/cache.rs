//! On-disk response cache.
//!
//! Upstream responses are stored verbatim, one file per request URL,
//! named by the SHA-256 of the URL. Entries never expire: timing data
//! for a finished session does not change. Every write goes to its own
//! temporary file and is renamed into place, so concurrent writers of
//! one entry never share a file and a reader never sees a partial body.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::SourceError;

/// Per-process sequence for temporary file names.
static NEXT_TMP: AtomicU64 = AtomicU64::new(0);

/// A directory of cached upstream response bodies.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Open (creating if needed) a cache rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Cache`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| SourceError::Cache {
                path: dir.clone(),
                source,
            })?;
        Ok(Self { dir })
    }

    /// The cache root.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `url`.
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(url)))
    }

    /// Read the cached body for `url`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Cache`] on any I/O failure other than a
    /// missing entry.
    pub async fn get(&self, url: &str) -> Result<Option<Vec<u8>>, SourceError> {
        let path = self.entry_path(url);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(url, path = %path.display(), "cache hit");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SourceError::Cache { path, source }),
        }
    }

    /// Store `body` as the entry for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Cache`] if the temporary file cannot be
    /// written or renamed.
    pub async fn put(&self, url: &str, body: &[u8]) -> Result<(), SourceError> {
        let path = self.entry_path(url);
        let seq = NEXT_TMP.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("tmp.{}.{seq}", std::process::id()));

        if let Err(source) = tokio::fs::write(&tmp, body).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(SourceError::Cache { path: tmp, source });
        }
        if let Err(source) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(SourceError::Cache { path, source });
        }

        debug!(url, path = %path.display(), bytes = body.len(), "cache store");
        Ok(())
    }

    /// Drop the entry for `url`. A missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Cache`] if the file exists but cannot be
    /// removed.
    pub async fn remove(&self, url: &str) -> Result<(), SourceError> {
        let path = self.entry_path(url);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(url, path = %path.display(), "cache evict");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SourceError::Cache { path, source }),
        }
    }
}

/// Lowercase hex SHA-256 of the request URL.
fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}
