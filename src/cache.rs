//! Content-addressed file cache for API responses.
//!
//! One file per request URL: the filename is the hex SHA-256 of the URL,
//! the payload a JSON envelope of response bytes plus an expiration
//! instant. Expired entries act as misses and are evicted on read.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(90);

/// Cache hook used by the API client. Implementations must be safe to
/// share across worker tasks.
pub trait ResponseCache: Send + Sync {
    /// Stored bytes for `key`, or `None` on miss/expiry.
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    /// Store the response bytes for `key`.
    fn put(&self, key: &str, value: &[u8]) -> io::Result<()>;
}

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// File-backed [`ResponseCache`] with a fixed TTL.
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FileCache {
    /// Create the cache, creating `dir` (mode 0750 on Unix) if needed.
    pub fn new(dir: impl AsRef<Path>, ttl: Duration) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o750))?;
        }
        Ok(Self { dir, ttl })
    }

    /// Platform cache directory: `$XDG_CACHE_HOME/railboard` or
    /// `~/.cache/railboard`, with a temp-dir fallback.
    pub fn default_dir() -> PathBuf {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            if !xdg.is_empty() {
                return Path::new(&xdg).join("railboard");
            }
        }
        dirs::cache_dir()
            .map(|d| d.join("railboard"))
            .unwrap_or_else(|| std::env::temp_dir().join("railboard-cache"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let hash = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(hash)))
    }

    /// Remove every cache entry.
    pub fn clear(&self) -> io::Result<()> {
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                let _ = fs::remove_file(path);
            }
        }
        Ok(())
    }

    /// Remove expired entries. Not required for correctness; reads already
    /// evict lazily.
    pub fn cleanup(&self) -> io::Result<()> {
        let now = Utc::now();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            let Ok(data) = fs::read(&path) else { continue };
            match serde_json::from_slice::<CacheEntry>(&data) {
                Ok(ce) if ce.expires_at > now => {}
                _ => {
                    let _ = fs::remove_file(&path);
                }
            }
        }
        Ok(())
    }
}

impl ResponseCache for FileCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key);
        let data = fs::read(&path).ok()?;

        let entry: CacheEntry = match serde_json::from_slice(&data) {
            Ok(e) => e,
            Err(_) => {
                let _ = fs::remove_file(&path);
                return None;
            }
        };

        if Utc::now() > entry.expires_at {
            let _ = fs::remove_file(&path);
            return None;
        }

        Some(entry.data)
    }

    fn put(&self, key: &str, value: &[u8]) -> io::Result<()> {
        let entry = CacheEntry {
            data: value.to_vec(),
            expires_at: Utc::now()
                + chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::zero()),
        };
        let data = serde_json::to_vec(&entry)?;
        let path = self.path_for(key);
        fs::write(&path, data)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), DEFAULT_TTL).unwrap();

        assert!(cache.get("https://example.test/a").is_none());
        cache.put("https://example.test/a", b"payload").unwrap();
        assert_eq!(cache.get("https://example.test/a").unwrap(), b"payload");

        // Distinct URLs land in distinct files.
        cache.put("https://example.test/b", b"other").unwrap();
        assert_eq!(cache.get("https://example.test/a").unwrap(), b"payload");
        assert_eq!(cache.get("https://example.test/b").unwrap(), b"other");
    }

    #[test]
    fn expired_entries_are_evicted_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), Duration::from_secs(0)).unwrap();

        cache.put("https://example.test/a", b"payload").unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get("https://example.test/a").is_none());

        // The file is gone, not just ignored.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn corrupt_entries_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path(), DEFAULT_TTL).unwrap();

        let path = cache.path_for("https://example.test/a");
        fs::write(&path, b"not json").unwrap();
        assert!(cache.get("https://example.test/a").is_none());
        assert!(!path.exists());
    }

    #[test]
    fn cleanup_removes_only_expired() {
        let dir = tempfile::tempdir().unwrap();
        let fresh = FileCache::new(dir.path(), DEFAULT_TTL).unwrap();
        let stale = FileCache::new(dir.path(), Duration::from_secs(0)).unwrap();

        fresh.put("https://example.test/fresh", b"1").unwrap();
        stale.put("https://example.test/stale", b"2").unwrap();
        std::thread::sleep(Duration::from_millis(20));

        fresh.cleanup().unwrap();
        assert!(fresh.get("https://example.test/fresh").is_some());
        assert!(fresh.get("https://example.test/stale").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("cache");
        let cache = FileCache::new(&sub, DEFAULT_TTL).unwrap();
        cache.put("https://example.test/a", b"payload").unwrap();

        let dir_mode = fs::metadata(&sub).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o750);

        let file = cache.path_for("https://example.test/a");
        let file_mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
    }
}
