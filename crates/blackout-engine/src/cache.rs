//! Local cache of the in-progress interval list.
//!
//! The cache survives reloads of the same editing session. Its contents are
//! untrusted: [`decode_snapshot`] parses every date and re-checks the
//! non-overlap invariant, reporting `MalformedCacheData` on any problem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BlackoutError, Result};
use crate::interval::{parse_iso_day, DateInterval};
use crate::store::IntervalStore;

/// A key-value store scoped to the editing session.
pub trait SessionCache {
    /// # Errors
    /// Returns `BlackoutError::Cache` if the backing store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// # Errors
    /// Returns `BlackoutError::Cache` if the backing store cannot be written.
    fn store(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    /// Returns `BlackoutError::Cache` if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Process-local cache, mostly for tests and hosts without storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: HashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionCache for MemoryCache {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_stem))
    }
}

impl SessionCache for FileCache {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| BlackoutError::Cache(format!("failed to read {}: {}", path.display(), e)))
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            BlackoutError::Cache(format!("failed to create {}: {}", self.dir.display(), e))
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|e| BlackoutError::Cache(format!("failed to write {}: {}", path.display(), e)))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlackoutError::Cache(format!(
                "failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Cached shape of one interval. Dates stay strings until validated.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedInterval {
    start_date: String,
    end_date: String,
}

/// Serialize intervals as `[{"startDate":"YYYY-MM-DD","endDate":"YYYY-MM-DD"}, ...]`.
///
/// # Errors
/// Returns `BlackoutError::Cache` if serialization fails.
pub fn encode_snapshot(intervals: &[DateInterval]) -> Result<String> {
    let cached: Vec<CachedInterval> = intervals
        .iter()
        .map(|interval| CachedInterval {
            start_date: interval.start().format("%Y-%m-%d").to_string(),
            end_date: interval.end().format("%Y-%m-%d").to_string(),
        })
        .collect();
    serde_json::to_string(&cached).map_err(|e| BlackoutError::Cache(format!("Serialization error: {}", e)))
}

/// Parse and validate a cached snapshot.
///
/// # Errors
/// Returns `BlackoutError::MalformedCacheData` if the JSON does not have the
/// cached shape, a date does not parse, an interval is reversed, or two
/// intervals overlap.
pub fn decode_snapshot(raw: &str) -> Result<IntervalStore> {
    let cached: Vec<CachedInterval> =
        serde_json::from_str(raw).map_err(|e| BlackoutError::MalformedCacheData(e.to_string()))?;

    let intervals = cached
        .iter()
        .map(|entry| {
            let start = parse_iso_day(&entry.start_date)?;
            let end = parse_iso_day(&entry.end_date)?;
            DateInterval::new(start, end)
        })
        .collect::<Result<Vec<_>>>()
        .map_err(|e| BlackoutError::MalformedCacheData(e.to_string()))?;

    IntervalStore::try_from_intervals(intervals)
}
