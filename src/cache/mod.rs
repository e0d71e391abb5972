use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::github::StateFilter;

/// Configuration for the time-bounded response cache
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(300),
        }
    }
}

/// Get the platform-appropriate cache directory for pr-pulse
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("pr-pulse/response-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/pr-pulse/response-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the response cache directory
pub fn clear_cache() -> Result<()> {
    let cache_path = get_cache_path();
    match std::fs::remove_dir_all(&cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// A cached value with its fetch timestamp, serialized to cacache as JSON
#[derive(Serialize, Deserialize)]
struct CacheEntry<T> {
    fetched_at: DateTime<Utc>,
    value: T,
}

/// Fingerprint the token so cache keys are scoped to a credential identity
/// without ever writing the token itself to disk.
fn token_fingerprint(token: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    hasher.finish()
}

/// Cache key for a stats aggregation
pub fn stats_key(token: &str, username: &str, repo: Option<&str>) -> String {
    format!(
        "stats:{:016x}:{}:{}",
        token_fingerprint(token),
        username,
        repo.unwrap_or("*")
    )
}

/// Cache key for a listing
pub fn list_key(token: &str, username: &str, repo: Option<&str>, state: StateFilter) -> String {
    format!(
        "list:{:016x}:{}:{}:{}",
        token_fingerprint(token),
        username,
        repo.unwrap_or("*"),
        state
    )
}

/// Load a cached value if present and younger than `ttl`.
///
/// Any read, parse, or clock anomaly is treated as a miss.
pub fn load<T: DeserializeOwned>(cache_path: &Path, key: &str, ttl: Duration) -> Option<T> {
    let bytes = cacache::read_sync(cache_path, key).ok()?;
    let entry: CacheEntry<T> = serde_json::from_slice(&bytes).ok()?;
    let age = Utc::now().signed_duration_since(entry.fetched_at).to_std().ok()?;
    if age > ttl {
        return None;
    }
    Some(entry.value)
}

/// Store a value under `key`. Disk errors are ignored; the cache is an
/// optimization, not a source of truth.
pub fn store<T: Serialize>(cache_path: &Path, key: &str, value: &T) {
    let entry = CacheEntry {
        fetched_at: Utc::now(),
        value,
    };
    if let Ok(serialized) = serde_json::to_vec(&entry) {
        let _ = cacache::write_sync(cache_path, key, &serialized);
    }
}
