use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::CacheError;
use crate::api::Response;

const META_EXT: &str = "json";
const BODY_EXT: &str = "body";

/// Suffix of the directory a store is assembled in before it is committed.
const STAGING_SUFFIX: &str = ".staging";
const RETIRED_SUFFIX: &str = ".retired";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Minutes since the entry was written. Negative if the clock went back.
    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    /// Coarse age for listings: minutes under an hour, then whole hours, then
    /// whole days, each rounded to the nearest unit.
    pub fn age_display(&self) -> String {
        const HOUR: i64 = 60;
        const DAY: i64 = 24 * HOUR;
        let nearest = |minutes: i64, unit: i64| (minutes + unit / 2) / unit;

        match self.age_minutes() {
            m if m < 1 => "just now".to_string(),
            m if m < HOUR => format!("{}m ago", m),
            m if m < DAY => format!("{}h ago", nearest(m, HOUR)),
            m => format!("{}d ago", nearest(m, DAY)),
        }
    }
}

/// Response metadata kept next to the body file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponse {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

/// All named stores, one directory each under a root.
#[derive(Debug, Clone)]
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.store_dir(name).is_dir()
    }

    /// Open a store, creating it if needed.
    pub fn open(&self, name: &str) -> Result<CacheStore, CacheError> {
        let dir = self.store_dir(name);
        std::fs::create_dir_all(&dir)?;
        Ok(CacheStore {
            name: name.to_string(),
            dir,
        })
    }

    /// Names of every store on disk, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Remove a store. Returns whether it existed.
    pub fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let dir = self.store_dir(name);
        if !dir.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(&dir)?;
        debug!(store = name, "Deleted cache store");
        Ok(true)
    }

    /// Replace the store `name` with exactly `responses`.
    ///
    /// Entries are written to a staging directory first and swapped in with a
    /// rename, so readers see either the old store or the complete new one.
    pub fn commit(&self, name: &str, responses: &[Response]) -> Result<(), CacheError> {
        let staging_name = format!("{}{}", name, STAGING_SUFFIX);
        self.delete(&staging_name)?;

        let staging = self.open(&staging_name)?;
        for response in responses {
            staging.put(&response.url, response)?;
        }

        let target = self.store_dir(name);
        let retired = self.store_dir(&format!("{}{}", name, RETIRED_SUFFIX));
        if target.exists() {
            if retired.exists() {
                std::fs::remove_dir_all(&retired)?;
            }
            std::fs::rename(&target, &retired)?;
        }
        std::fs::rename(&staging.dir, &target)?;
        if retired.exists() {
            if let Err(e) = std::fs::remove_dir_all(&retired) {
                warn!(store = name, error = %e, "Failed to remove retired store");
            }
        }
        Ok(())
    }
}

/// One named store of URL-keyed responses.
#[derive(Debug, Clone)]
pub struct CacheStore {
    name: String,
    dir: PathBuf,
}

impl CacheStore {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry_path(&self, url: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", entry_key(url), ext))
    }

    /// Store a copy of `response` under `url`, replacing any previous entry.
    pub fn put(&self, url: &str, response: &Response) -> Result<(), CacheError> {
        // Body first: an entry only counts once its metadata exists
        std::fs::write(self.entry_path(url, BODY_EXT), &response.body)?;

        let meta = CachedData::new(StoredResponse {
            url: url.to_string(),
            status: response.status,
            headers: response.headers.clone(),
        });
        let contents = serde_json::to_string_pretty(&meta)?;
        std::fs::write(self.entry_path(url, META_EXT), contents)?;
        Ok(())
    }

    pub fn get(&self, url: &str) -> Result<Option<CachedData<Response>>, CacheError> {
        let meta_path = self.entry_path(url, META_EXT);
        if !meta_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&meta_path)?;
        let meta: CachedData<StoredResponse> = serde_json::from_str(&contents)?;
        let body = std::fs::read(self.entry_path(url, BODY_EXT))?;

        Ok(Some(CachedData {
            data: Response {
                url: meta.data.url,
                status: meta.data.status,
                headers: meta.data.headers,
                body,
            },
            cached_at: meta.cached_at,
        }))
    }

    /// Metadata of every entry, sorted by URL. Unreadable entries are skipped.
    pub fn entries(&self) -> Result<Vec<CachedData<StoredResponse>>, CacheError> {
        let mut entries = Vec::new();
        for dir_entry in std::fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(META_EXT) {
                continue;
            }
            let parsed = std::fs::read_to_string(&path)
                .map_err(CacheError::from)
                .and_then(|c| serde_json::from_str::<CachedData<StoredResponse>>(&c).map_err(CacheError::from));
            match parsed {
                Ok(meta) => entries.push(meta),
                Err(e) => debug!(path = %path.display(), error = %e, "Skipping unreadable cache entry"),
            }
        }
        entries.sort_by(|a, b| a.data.url.cmp(&b.data.url));
        Ok(entries)
    }
}

/// Longest percent-encoded key used as a file name as is. Leaves room for the
/// extension under the usual 255-byte name limit.
const MAX_PLAIN_KEY_LEN: usize = 200;

/// Marks a hashed key. Never produced by the percent encoding, which escapes `~`.
const HASHED_KEY_PREFIX: char = '~';

/// File-name-safe encoding of a URL: unreserved ASCII is kept and every other
/// byte becomes `%XX`. Keys that would be too long for a file name are
/// replaced by the SHA-256 of the URL.
fn entry_key(url: &str) -> String {
    let mut key = String::with_capacity(url.len());
    for byte in url.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            key.push(byte as char);
        } else {
            key.push_str(&format!("%{:02X}", byte));
        }
    }
    if key.len() <= MAX_PLAIN_KEY_LEN {
        return key;
    }

    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{}{}", HASHED_KEY_PREFIX, hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn storage() -> (tempfile::TempDir, CacheStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().join("caches")).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_entry_key_is_injective_and_flat() {
        let a = entry_key("http://x/assets/data/a_b.json");
        let b = entry_key("http://x/assets/data/a/b.json");
        assert_ne!(a, b);
        assert!(!a.contains('/'));
        assert!(!a.contains('.'));
    }

    #[test]
    fn test_long_urls_get_hashed_keys() {
        let (_dir, storage) = storage();
        let store = storage.open("aakhar-dynamic-v2").unwrap();
        let long = format!("http://x/assets/images/{}.jpg", "Very.Long/Name:".repeat(30));
        let other = format!("{}?v=2", long);

        let key = entry_key(&long);
        assert!(key.starts_with(HASHED_KEY_PREFIX));
        assert!(key.len() <= MAX_PLAIN_KEY_LEN);
        assert_ne!(key, entry_key(&other));

        store.put(&long, &Response::ok(&long, "jpeg")).unwrap();
        assert_eq!(store.get(&long).unwrap().unwrap().data.body, b"jpeg");
        assert!(store.get(&other).unwrap().is_none());
        assert_eq!(store.entries().unwrap()[0].data.url, long);
    }

    #[test]
    fn test_put_then_get_returns_copy() {
        let (_dir, storage) = storage();
        let store = storage.open("aakhar-dynamic-v2").unwrap();
        let url = "http://x/assets/images/Water.jpg";
        let mut response = Response::ok(url, vec![0xFF, 0xD8, 0x00]);
        response.headers.push(("content-type".into(), "image/jpeg".into()));

        assert!(store.get(url).unwrap().is_none());
        store.put(url, &response).unwrap();

        let cached = store.get(url).unwrap().unwrap();
        assert_eq!(cached.data, response);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_keys_and_delete() {
        let (_dir, storage) = storage();
        storage.open("b-store").unwrap();
        storage.open("a-store").unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["a-store", "b-store"]);

        assert!(storage.delete("a-store").unwrap());
        assert!(!storage.delete("a-store").unwrap());
        assert_eq!(storage.keys().unwrap(), vec!["b-store"]);
    }

    #[test]
    fn test_commit_replaces_store_wholesale() {
        let (_dir, storage) = storage();
        let old = storage.open("shell").unwrap();
        old.put("http://x/old.js", &Response::ok("http://x/old.js", "old")).unwrap();

        storage
            .commit("shell", &[Response::ok("http://x/index.html", "<html>")])
            .unwrap();

        let store = storage.open("shell").unwrap();
        assert!(store.get("http://x/old.js").unwrap().is_none());
        assert!(store.get("http://x/index.html").unwrap().is_some());
        assert_eq!(storage.keys().unwrap(), vec!["shell"]);
    }

    #[test]
    fn test_entries_lists_metadata() {
        let (_dir, storage) = storage();
        let store = storage.open("s").unwrap();
        store.put("http://x/b", &Response::ok("http://x/b", "2")).unwrap();
        store.put("http://x/a", &Response::ok("http://x/a", "1")).unwrap();

        let urls: Vec<String> = store.entries().unwrap().into_iter().map(|e| e.data.url).collect();
        assert_eq!(urls, vec!["http://x/a", "http://x/b"]);
    }

    #[test]
    fn test_age_display() {
        let mut cached = CachedData::new(());
        cached.cached_at = Utc::now() - Duration::minutes(61);
        assert_eq!(cached.age_display(), "1h ago");
        cached.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(cached.age_display(), "2h ago");
        cached.cached_at = Utc::now() - Duration::days(3);
        assert_eq!(cached.age_display(), "3d ago");
        cached.cached_at = Utc::now() - Duration::hours(36);
        assert_eq!(cached.age_display(), "2d ago");
    }

    #[test]
    fn test_age_display_for_future_timestamp() {
        let mut cached = CachedData::new(());
        cached.cached_at = Utc::now() + Duration::minutes(10);
        assert!(cached.age_minutes() < 0);
        assert_eq!(cached.age_display(), "just now");
    }
}
