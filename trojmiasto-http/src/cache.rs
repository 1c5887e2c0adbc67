//! Filesystem-backed response cache, keyed by the exact URL string.
//!
//! Enabled only for debug-mode runs. Entries are serde_json-encoded
//! [`PageResponse`] files named by the blake3 hash of the URL, so cache
//! contents survive across processes but carry no freshness information.
//! Callers must treat hits as advisory; stale data is tolerated.

use std::fs;
use std::path::{Path, PathBuf};

use crate::PageResponse;

pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let key = blake3::hash(url.as_bytes()).to_hex();
        self.dir.join(format!("{key}.json"))
    }

    /// Cached response for `url`, if one exists and still decodes.
    pub fn load(&self, url: &str) -> Option<PageResponse> {
        let path = self.entry_path(url);
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(response) => Some(response),
            Err(e) => {
                // Undecodable entries are treated as misses, not failures.
                tracing::warn!(url, path = %path.display(), error = %e, "discarding corrupt cache entry");
                None
            }
        }
    }

    /// Persist a response. Failures are logged and swallowed; the cache is
    /// never allowed to fail a fetch.
    pub fn store(&self, url: &str, response: &PageResponse) {
        let path = self.entry_path(url);
        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "cache directory unavailable");
            return;
        }
        let encoded = match serde_json::to_string(response) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to encode response for cache");
                return;
            }
        };
        if let Err(e) = fs::write(&path, encoded) {
            tracing::warn!(url, path = %path.display(), error = %e, "cache write failed");
        }
    }
}
