//! File-based cache of resolved activity timestamps.
//!
//! A published version's timestamp never changes, so only successful lookups
//! are stored. Entries expire by file age.

use crate::error::{Result, ScanError};
use crate::model::DependencyCoordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// On-disk entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedActivity {
    path: String,
    version: String,
    last_activity: DateTime<Utc>,
}

/// File cache keyed by a SHA-256 of the coordinate.
#[derive(Debug, Clone)]
pub struct ActivityCache {
    cache_dir: PathBuf,
    ttl: Duration,
    bypass: bool,
}

impl ActivityCache {
    /// Open (creating if needed) a cache directory.
    pub fn new(cache_dir: PathBuf, ttl: Duration) -> Result<Self> {
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).map_err(|e| ScanError::io(&cache_dir, e))?;
        }
        Ok(Self {
            cache_dir,
            ttl,
            bypass: false,
        })
    }

    /// Skip reads while still recording fresh lookups.
    #[must_use]
    pub const fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Filesystem-safe file name for a coordinate.
    #[must_use]
    pub fn file_name(coordinate: &DependencyCoordinate) -> String {
        let mut hasher = Sha256::new();
        hasher.update(coordinate.path.as_bytes());
        hasher.update(b"@");
        hasher.update(coordinate.version.as_bytes());
        format!("{:x}.json", hasher.finalize())
    }

    /// Cached timestamp, if present and fresh.
    pub fn get(&self, coordinate: &DependencyCoordinate) -> Option<DateTime<Utc>> {
        if self.bypass {
            return None;
        }

        let path = self.cache_dir.join(Self::file_name(coordinate));
        let metadata = fs::metadata(&path).ok()?;
        let age = metadata.modified().ok()?.elapsed().ok()?;
        if age > self.ttl {
            let _ = fs::remove_file(&path);
            return None;
        }

        let data = fs::read_to_string(&path).ok()?;
        let entry: CachedActivity = serde_json::from_str(&data).ok()?;
        // Guard against a hash collision or a hand-edited file.
        (entry.path == coordinate.path && entry.version == coordinate.version)
            .then_some(entry.last_activity)
    }

    /// Record a resolved timestamp.
    ///
    /// The entry is written to a temporary file and renamed into place, so
    /// concurrent readers never see a partial entry.
    pub fn set(
        &self,
        coordinate: &DependencyCoordinate,
        last_activity: DateTime<Utc>,
    ) -> Result<()> {
        let entry = CachedActivity {
            path: coordinate.path.clone(),
            version: coordinate.version.clone(),
            last_activity,
        };
        let data = serde_json::to_vec(&entry)?;

        let target = self.cache_dir.join(Self::file_name(coordinate));
        let mut tmp = tempfile::NamedTempFile::new_in(&self.cache_dir)
            .map_err(|e| ScanError::io(&self.cache_dir, e))?;
        tmp.write_all(&data).map_err(|e| ScanError::io(tmp.path(), e))?;
        tmp.persist(&target)
            .map_err(|e| ScanError::io(&target, e.error))?;
        Ok(())
    }

    /// Remove every cached entry, returning how many were deleted.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.cache_dir).map_err(|e| ScanError::io(&self.cache_dir, e))? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
