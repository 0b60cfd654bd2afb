//! Cache manager for persisting API responses to disk
//!
//! Provides a `CacheManager` that stores serializable data to JSON files with
//! expiry timestamps. Each key maps to one file named by the SHA-256 of the key,
//! so caller-supplied keys never influence the path beyond the cache directory.
//!
//! There is no cross-process locking: two writers racing on one key leave the
//! last rename in place. Writes go through a temporary file in the same
//! directory, so readers only ever see complete entries.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};

/// Errors surfaced by cache writes
///
/// Reads never fail; see [`CacheManager::get`].
#[derive(Debug, Error)]
pub enum CacheError {
    /// The key was empty
    #[error("Cache key must not be empty")]
    InvalidKey,

    /// The value could not be serialized
    #[error("Failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),

    /// The entry could not be written to disk
    #[error("Failed to write cache entry: {0}")]
    Io(#[from] io::Error),
}

/// Latest expiry written to disk; longer TTLs saturate here
fn latest_expiry() -> DateTime<Utc> {
    DateTime::from_timestamp(253_402_300_799, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached value
    value: T,
    /// When the value was cached
    cached_at: DateTime<Utc>,
    /// When the entry stops being served
    expires_at: DateTime<Utc>,
}

/// Outcome of a cache read, including why a read missed
#[derive(Debug, PartialEq)]
pub enum Lookup<T> {
    /// A fresh entry decoded into the requested type
    Hit(T),
    /// No entry file for this key
    Absent,
    /// The entry had expired; its file has been removed
    Expired,
    /// The entry file could not be decoded into the requested type
    Corrupt,
}

impl<T> Lookup<T> {
    /// Collapses every kind of miss into `None`
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Hit(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }
}

/// Manages reading and writing cached data to disk
///
/// The manager never creates its directory on its own; the owner calls
/// [`CacheManager::ensure_dir`] (or creates it some other way) before first use.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
    /// Time source for stamping and expiring entries
    clock: Arc<dyn Clock>,
}

impl CacheManager {
    /// Creates a new CacheManager rooted at `cache_dir`
    ///
    /// The directory is neither validated nor created.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Returns the XDG-compliant cache directory for docli
    ///
    /// Uses `~/.cache/docli/` on Linux, or the equivalent path on other platforms.
    /// Returns `None` if no home directory can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "docli").map(|dirs| dirs.cache_dir().to_path_buf())
    }

    /// Replaces the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Creates the cache directory and any missing parents
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Returns the path of the file holding the entry for `key`
    pub fn cache_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.cache_dir.join(format!("{}.json", hex::encode(digest)))
    }

    /// Writes `value` under `key`, served until `ttl` has elapsed
    ///
    /// A zero `ttl` still writes the entry, which then reads back as expired.
    /// Any previous entry for the key is replaced in full.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(CacheError)` if the key is empty, the value cannot be serialized,
    ///   or the file cannot be written
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }

        let now = self.clock.now();
        let expires_at = ChronoDuration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .map_or(latest_expiry(), |at| at.min(latest_expiry()));

        let entry = CacheEntry {
            value,
            cached_at: now,
            expires_at,
        };
        let json = serde_json::to_vec(&entry)?;

        let mut file = NamedTempFile::new_in(&self.cache_dir)?;
        file.write_all(&json)?;
        file.as_file().sync_all()?;
        file.persist(self.cache_path(key)).map_err(|e| e.error)?;

        debug!(key, %expires_at, "Cache entry written");
        Ok(())
    }

    /// Reads the entry for `key`, returning `None` on any kind of miss
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lookup(key).into_option()
    }

    /// Reads the entry for `key`, reporting why the read missed
    ///
    /// Expired entries are deleted as a side effect. Undecodable entries are
    /// logged and left in place until the next `set` replaces them.
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        if key.is_empty() {
            return Lookup::Absent;
        }

        let path = self.cache_path(key);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!(key, error = %e, "Cache entry unreadable");
                }
                return Lookup::Absent;
            }
        };

        let entry: CacheEntry<serde_json::Value> = match serde_json::from_slice(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "Failed to decode cache entry");
                return Lookup::Corrupt;
            }
        };

        if self.clock.now() >= entry.expires_at {
            debug!(key, expires_at = %entry.expires_at, "Cache entry expired");
            if let Err(e) = fs::remove_file(&path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(key, error = %e, "Failed to remove expired cache entry");
                }
            }
            return Lookup::Expired;
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Lookup::Hit(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Cached value does not match the requested type");
                Lookup::Corrupt
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[derive(Debug)]
    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc::now())))
        }

        fn advance(&self, by: ChronoDuration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn create_test_cache() -> (CacheManager, Arc<ManualClock>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let clock = ManualClock::new();
        let cache = CacheManager::new(temp_dir.path()).with_clock(clock.clone());
        (cache, clock, temp_dir)
    }

    fn sample() -> TestData {
        TestData {
            name: "web-1".to_string(),
            value: 1,
        }
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let (cache, _clock, _temp_dir) = create_test_cache();

        cache
            .set("droplets:list", &sample(), Duration::from_secs(300))
            .expect("Write should succeed");

        let result: Option<TestData> = cache.get("droplets:list");
        assert_eq!(result, Some(sample()));
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let (cache, _clock, _temp_dir) = create_test_cache();

        let result: Option<TestData> = cache.get("nonexistent_key");
        assert!(result.is_none());
        assert_eq!(cache.lookup::<TestData>("nonexistent_key"), Lookup::Absent);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (cache, clock, _temp_dir) = create_test_cache();

        cache
            .set("expiring", &sample(), Duration::from_secs(60))
            .expect("Write should succeed");

        clock.advance(ChronoDuration::seconds(59));
        assert!(cache.get::<TestData>("expiring").is_some());

        clock.advance(ChronoDuration::seconds(1));
        assert_eq!(cache.lookup::<TestData>("expiring"), Lookup::Expired);
    }

    #[test]
    fn test_expired_read_removes_file() {
        let (cache, clock, _temp_dir) = create_test_cache();
        let path = cache.cache_path("stale");

        cache
            .set("stale", &sample(), Duration::from_secs(10))
            .expect("Write should succeed");
        assert!(path.exists());

        clock.advance(ChronoDuration::seconds(11));
        assert!(cache.get::<TestData>("stale").is_none());
        assert!(!path.exists(), "Expired entry should be deleted on read");

        // Once removed, the key simply reads as absent
        assert_eq!(cache.lookup::<TestData>("stale"), Lookup::Absent);
    }

    #[test]
    fn test_zero_ttl_is_written_but_already_expired() {
        let (cache, _clock, _temp_dir) = create_test_cache();
        let path = cache.cache_path("instant");

        cache
            .set("instant", &sample(), Duration::ZERO)
            .expect("Write should succeed");
        assert!(path.exists());

        assert_eq!(cache.lookup::<TestData>("instant"), Lookup::Expired);
        assert!(!path.exists());
    }

    #[test]
    fn test_garbage_file_is_a_miss() {
        let (cache, _clock, _temp_dir) = create_test_cache();
        fs::write(cache.cache_path("garbage"), b"\x00\xffnot json{{").unwrap();

        assert_eq!(cache.lookup::<TestData>("garbage"), Lookup::Corrupt);
        assert!(cache.get::<TestData>("garbage").is_none());
    }

    #[test]
    fn test_old_format_file_is_a_miss() {
        let (cache, _clock, _temp_dir) = create_test_cache();
        let old = r#"{"data":{"name":"web-1","value":1},"cached_at":"2024-07-15T00:00:00Z","is_expired":false}"#;
        fs::write(cache.cache_path("old"), old).unwrap();

        assert_eq!(cache.lookup::<TestData>("old"), Lookup::Corrupt);
    }

    #[test]
    fn test_shape_mismatch_is_a_miss() {
        let (cache, _clock, _temp_dir) = create_test_cache();

        cache
            .set("mismatch", "just a string", Duration::from_secs(60))
            .expect("Write should succeed");

        assert_eq!(cache.lookup::<TestData>("mismatch"), Lookup::Corrupt);
        assert_eq!(
            cache.get::<String>("mismatch").as_deref(),
            Some("just a string")
        );
    }

    #[test]
    fn test_overwrite_existing_entry() {
        let (cache, _clock, _temp_dir) = create_test_cache();
        let data1 = TestData {
            name: "first".to_string(),
            value: 1,
        };
        let data2 = TestData {
            name: "second".to_string(),
            value: 2,
        };

        cache
            .set("overwrite_key", &data1, Duration::from_secs(60))
            .expect("First write should succeed");
        cache
            .set("overwrite_key", &data2, Duration::from_secs(60))
            .expect("Second write should succeed");

        let result: Option<TestData> = cache.get("overwrite_key");
        assert_eq!(result, Some(data2));
    }

    #[test]
    fn test_overwrite_resets_expiry() {
        let (cache, clock, _temp_dir) = create_test_cache();

        cache
            .set("renewed", &sample(), Duration::from_secs(60))
            .unwrap();
        clock.advance(ChronoDuration::seconds(50));
        cache
            .set("renewed", &sample(), Duration::from_secs(60))
            .unwrap();
        clock.advance(ChronoDuration::seconds(50));

        assert!(cache.lookup::<TestData>("renewed").is_hit());
    }

    #[test]
    fn test_cache_path_stays_inside_cache_dir() {
        let (cache, _clock, temp_dir) = create_test_cache();

        for key in ["../../etc/passwd", "/absolute", "a/b\\c", "..", "droplets:list"] {
            let path = cache.cache_path(key);
            assert_eq!(path.parent(), Some(temp_dir.path()), "key {:?}", key);

            let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
            assert_eq!(file_name.len(), 64 + ".json".len());
            assert!(file_name.ends_with(".json"));
        }
    }

    #[test]
    fn test_cache_path_is_deterministic_and_distinct() {
        let (cache, _clock, _temp_dir) = create_test_cache();

        assert_eq!(cache.cache_path("vpcs:list"), cache.cache_path("vpcs:list"));
        assert_ne!(cache.cache_path("vpcs:list"), cache.cache_path("vpcs:List"));
        assert_ne!(cache.cache_path("a"), cache.cache_path("a "));
    }

    #[test]
    fn test_traversal_key_round_trips() {
        let (cache, _clock, temp_dir) = create_test_cache();

        cache
            .set("../escape", &sample(), Duration::from_secs(60))
            .expect("Write should succeed");

        assert_eq!(cache.get::<TestData>("../escape"), Some(sample()));
        assert!(!temp_dir.path().parent().unwrap().join("escape").exists());
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let (cache, _clock, _temp_dir) = create_test_cache();

        let result = cache.set("", &sample(), Duration::from_secs(60));
        assert!(matches!(result, Err(CacheError::InvalidKey)));
        assert_eq!(cache.lookup::<TestData>(""), Lookup::Absent);
    }

    #[test]
    fn test_write_leaves_no_temporary_files() {
        let (cache, _clock, temp_dir) = create_test_cache();

        cache.set("one", &sample(), Duration::from_secs(60)).unwrap();
        cache.set("one", &sample(), Duration::from_secs(60)).unwrap();
        cache.set("two", &sample(), Duration::from_secs(60)).unwrap();

        let files = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(files, 2);
    }

    #[test]
    fn test_set_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::new(temp_dir.path().join("missing"));

        let result = cache.set("key", &sample(), Duration::from_secs(60));
        assert!(matches!(result, Err(CacheError::Io(_))));
    }

    #[test]
    fn test_ensure_dir_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("nested").join("cache").join("dir");
        let cache = CacheManager::new(&nested_path);

        cache.ensure_dir().expect("Directory creation should succeed");
        cache
            .set("nested_key", &sample(), Duration::from_secs(60))
            .expect("Write should succeed");

        assert!(nested_path.exists());
        assert!(cache.cache_path("nested_key").starts_with(&nested_path));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let (cache, clock, _temp_dir) = create_test_cache();

        cache
            .set("forever", &sample(), Duration::MAX)
            .expect("Write should succeed");
        clock.advance(ChronoDuration::days(365 * 100));

        assert!(cache.lookup::<TestData>("forever").is_hit());
    }

    #[test]
    fn test_entry_file_is_json_envelope() {
        let (cache, _clock, _temp_dir) = create_test_cache();

        cache
            .set("envelope", &sample(), Duration::from_secs(60))
            .unwrap();

        let content = fs::read_to_string(cache.cache_path("envelope")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["value"]["name"], "web-1");
        assert!(json["expires_at"].is_string());
        assert!(json["cached_at"].is_string());
    }

    #[test]
    fn test_default_dir_names_project() {
        if let Some(dir) = CacheManager::default_dir() {
            assert!(dir.to_string_lossy().contains("docli"));
        }
        // Passes when no home directory is available (e.g. CI)
    }
}
