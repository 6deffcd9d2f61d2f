// Cache store for reading and writing cached data.
// A small key-value store where each payload key has a sibling `<key>_timestamp`
// holding the millisecond epoch it was written at.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{FolioError, Result};

use super::paths::sanitize_name;

/// Default TTL for the project list: 30 minutes.
pub const PROJECTS_TTL: Duration = Duration::from_secs(30 * 60);

/// Default TTL for the commit log: 15 minutes.
pub const COMMITS_TTL: Duration = Duration::from_secs(15 * 60);

/// String key-value storage, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Store backed by one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(sanitize_name(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        write_atomic(&self.path(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| FolioError::Other("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values()?.remove(key);
        Ok(())
    }
}

/// Cached payload together with the time it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// An entry is expired once its age reaches the TTL. Timestamps in the
    /// future count as expired.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let elapsed = now
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed >= ttl
    }

    pub fn is_valid(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        !self.is_expired(ttl, now)
    }
}

/// Key of the sibling entry holding the store time.
pub fn timestamp_key(key: &str) -> String {
    format!("{}_timestamp", key)
}

/// Read an entry regardless of age. A missing or unparsable timestamp is a miss.
pub fn read_cached<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<CachedData<T>>> {
    let Some(stamp) = store.get(&timestamp_key(key))? else {
        return Ok(None);
    };
    let Some(cached_at) = stamp
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
    else {
        return Ok(None);
    };
    let Some(payload) = store.get(key)? else {
        return Ok(None);
    };

    let data: T = serde_json::from_str(&payload)?;
    Ok(Some(CachedData { data, cached_at }))
}

/// Read an entry, returning None once it has expired.
pub fn read_if_valid<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<Option<T>> {
    match read_cached::<T>(store, key)? {
        Some(cached) if cached.is_valid(ttl, now) => Ok(Some(cached.data)),
        _ => Ok(None),
    }
}

/// Overwrite an entry and its timestamp.
pub fn write_cached<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    data: &T,
    now: DateTime<Utc>,
) -> Result<()> {
    let json = serde_json::to_string(data)?;
    store.set(key, &json)?;
    store.set(&timestamp_key(key), &now.timestamp_millis().to_string())?;
    Ok(())
}

/// Drop an entry and its timestamp.
pub fn invalidate(store: &dyn KeyValueStore, key: &str) -> Result<()> {
    store.remove(key)?;
    store.remove(&timestamp_key(key))
}

fn write_atomic(path: &Path, text: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
