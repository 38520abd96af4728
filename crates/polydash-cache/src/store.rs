//! On-disk snapshot storage.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, warn};

use polydash_types::{DateWindow, Ticker};

use crate::{CacheKey, Snapshot};

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to delete a file.
    #[error("Failed to delete file '{path}': {source}")]
    DeleteFile {
        /// The path that could not be deleted.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a directory.
    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse a snapshot file.
    #[error("Failed to parse snapshot file '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize a snapshot.
    #[error("Failed to serialize snapshot: {0}")]
    SerializeJson(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Summary of one stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Snapshot identity.
    pub key: CacheKey,
    /// When the snapshot was saved.
    pub saved_at: DateTime<Utc>,
    /// Number of tickers with results.
    pub results: usize,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Stores snapshots as JSON files.
///
/// Snapshots live in `<data dir>/polydash/snapshots/<key>.json`.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    /// Base directory for cache storage.
    base_path: PathBuf,
    /// Directory for snapshot files.
    snapshots_path: PathBuf,
}

impl SnapshotCache {
    /// Creates a cache rooted at the given base path.
    ///
    /// Creates the necessary subdirectories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn new(base_path: PathBuf) -> Result<Self> {
        let snapshots_path = base_path.join("snapshots");

        for path in [&base_path, &snapshots_path] {
            if !path.exists() {
                fs::create_dir_all(path).map_err(|e| CacheError::CreateDir {
                    path: path.clone(),
                    source: e,
                })?;
            }
        }

        Ok(Self {
            base_path,
            snapshots_path,
        })
    }

    /// Returns the default path for polydash cache storage.
    ///
    /// - Linux: `~/.local/share/polydash/`
    /// - macOS: `~/Library/Application Support/polydash/`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\polydash\`
    ///
    /// Falls back to `~/.polydash/` if the platform-specific location
    /// cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "polydash").map_or_else(dirs_fallback, |proj_dirs| {
            proj_dirs.data_dir().to_path_buf()
        })
    }

    /// Creates a cache at the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn with_default_path() -> Result<Self> {
        Self::new(Self::default_path())
    }

    /// Returns the base path for cache storage.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the path of a snapshot file.
    #[must_use]
    pub fn snapshot_path(&self, key: &CacheKey) -> PathBuf {
        self.snapshots_path.join(format!("{key}.json"))
    }

    /// Saves a snapshot, replacing any previous one with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path(&snapshot.key);
        let json = serde_json::to_string_pretty(snapshot)?;

        fs::write(&path, json).map_err(|e| CacheError::WriteFile { path: path.clone(), source: e })?;
        debug!(key = %snapshot.key, path = %path.display(), "Saved snapshot");
        Ok(())
    }

    /// Loads the snapshot for `key`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self, key: &CacheKey) -> Result<Option<Snapshot>> {
        let path = self.snapshot_path(key);

        if !path.exists() {
            return Ok(None);
        }

        read_snapshot(&path).map(Some)
    }

    /// Loads the snapshot for this request if it is no older than `max_age`
    /// at `now`.
    ///
    /// A stored snapshot whose source, tickers or window differ from the
    /// request is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_fresh(
        &self,
        source: &str,
        tickers: &[Ticker],
        window: &DateWindow,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<Option<Snapshot>> {
        let key = CacheKey::new(source, tickers, window);
        Ok(self.load(&key)?.filter(|snapshot| {
            if !snapshot.matches(source, tickers, window) {
                warn!(key = %key, "Snapshot belongs to a different request");
                return false;
            }
            let fresh = snapshot.is_fresh(now, max_age);
            if !fresh {
                debug!(key = %key, saved_at = %snapshot.saved_at, "Snapshot is stale");
            }
            fresh
        }))
    }

    /// Lists stored snapshots, newest first.
    ///
    /// Unreadable snapshot files are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshots directory cannot be read.
    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();

        for path in self.snapshot_files()? {
            let size_bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            match read_snapshot(&path) {
                Ok(snapshot) => entries.push(CacheEntry {
                    key: snapshot.key,
                    saved_at: snapshot.saved_at,
                    results: snapshot.results.len(),
                    size_bytes,
                }),
                Err(e) => warn!(error = %e, "Skipping unreadable snapshot"),
            }
        }

        entries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(entries)
    }

    /// Deletes every stored snapshot, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or a file cannot be
    /// deleted.
    pub fn clear(&self) -> Result<usize> {
        let files = self.snapshot_files()?;
        for path in &files {
            fs::remove_file(path).map_err(|e| CacheError::DeleteFile {
                path: path.clone(),
                source: e,
            })?;
        }
        debug!(removed = files.len(), "Cleared snapshots");
        Ok(files.len())
    }

    fn snapshot_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.snapshots_path).map_err(|e| CacheError::ReadDir {
            path: self.snapshots_path.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::ReadDir {
                path: self.snapshots_path.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(path).map_err(|e| CacheError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| CacheError::ParseJson {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".polydash")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use polydash_types::{DailyBar, TickerResult, TickerSummary};
    use tempfile::TempDir;

    const SOURCE: &str = "https://api.polygon.io";

    fn result(symbol: &str) -> TickerResult {
        let ticker = Ticker::new(symbol).unwrap();
        let bar = DailyBar::new(1000, 200.0, 221.0, 199.0, 220.0, 210.0, 1_000);
        TickerResult {
            summary: TickerSummary::from_bar(ticker.clone(), &bar),
            ticker,
            series: vec![bar],
        }
    }

    fn snapshot(symbols: &str, saved_at: DateTime<Utc>) -> Snapshot {
        let tickers = Ticker::parse_list(symbols).unwrap();
        let results = tickers.iter().map(|t| result(t.as_str())).collect();
        Snapshot::at(saved_at, SOURCE, tickers, DateWindow::reference(), results, vec![])
    }

    #[test]
    fn test_cache_creation() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(temp_dir.path().to_path_buf()).unwrap();

        assert!(cache.base_path().exists());
        assert!(temp_dir.path().join("snapshots").exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(temp_dir.path().to_path_buf()).unwrap();

        let saved = snapshot("TSLA,AAPL", Utc::now());
        cache.save(&saved).unwrap();

        let loaded = cache.load(&saved.key).unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(temp_dir.path().to_path_buf()).unwrap();

        let key = CacheKey::new(SOURCE, &[Ticker::new("TSLA").unwrap()], &DateWindow::reference());
        assert!(cache.load(&key).unwrap().is_none());
    }

    #[test]
    fn test_load_fresh_respects_max_age() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(temp_dir.path().to_path_buf()).unwrap();

        let saved_at = Utc::now();
        let saved = snapshot("TSLA", saved_at);
        cache.save(&saved).unwrap();

        let max_age = Duration::from_secs(600);
        let window = DateWindow::reference();
        let fresh = cache
            .load_fresh(SOURCE, &saved.tickers, &window, max_age, saved_at + TimeDelta::seconds(60))
            .unwrap();
        let stale = cache
            .load_fresh(SOURCE, &saved.tickers, &window, max_age, saved_at + TimeDelta::seconds(601))
            .unwrap();

        assert!(fresh.is_some());
        assert!(stale.is_none());
    }

    #[test]
    fn test_load_fresh_rejects_other_request_under_same_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(temp_dir.path().to_path_buf()).unwrap();

        let now = Utc::now();
        let window = DateWindow::reference();
        let pair = Ticker::parse_list("A,B").unwrap();

        // A snapshot for another ticker list stored under this request's key.
        let mut other = snapshot("A-B", now);
        other.key = CacheKey::new(SOURCE, &pair, &window);
        cache.save(&other).unwrap();

        let loaded = cache
            .load_fresh(SOURCE, &pair, &window, Duration::from_secs(600), now)
            .unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_fresh_is_scoped_to_source() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(temp_dir.path().to_path_buf()).unwrap();

        let now = Utc::now();
        let saved = snapshot("TSLA", now);
        cache.save(&saved).unwrap();

        let window = DateWindow::reference();
        let max_age = Duration::from_secs(600);
        assert!(
            cache
                .load_fresh("http://localhost:8080", &saved.tickers, &window, max_age, now)
                .unwrap()
                .is_none()
        );
        assert!(
            cache
                .load_fresh(SOURCE, &saved.tickers, &window, max_age, now)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_corrupt_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(temp_dir.path().to_path_buf()).unwrap();

        let key = CacheKey::new(SOURCE, &[Ticker::new("TSLA").unwrap()], &DateWindow::reference());
        fs::write(cache.snapshot_path(&key), "not json").unwrap();

        assert!(matches!(cache.load(&key), Err(CacheError::ParseJson { .. })));
        assert!(cache.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SnapshotCache::new(temp_dir.path().to_path_buf()).unwrap();

        let now = Utc::now();
        cache.save(&snapshot("TSLA", now - TimeDelta::seconds(30))).unwrap();
        cache.save(&snapshot("AAPL,MSFT", now)).unwrap();

        let entries = cache.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key.as_str(), "AAPL+MSFT_20240914_20241213_api.polygon.io");
        assert_eq!(entries[0].results, 2);
        assert!(entries[0].size_bytes > 0);

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.list().unwrap().is_empty());
    }
}
