use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::compile::fingerprint::ContentHash;
use crate::foundation::error::{StageError, StageResult};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One durable cache entry for a compiled scene module.
///
/// Immutable once written; a changed override set produces a new hash and a
/// new entry rather than mutating this one.
pub struct CacheEntry {
    /// Owning project.
    pub project_id: String,
    /// Content hash of the override set that produced this module.
    pub content_hash: ContentHash,
    /// Compiled module text.
    pub module_text: String,
    /// Unix seconds at write time.
    pub stored_at: u64,
}

/// Durable store of compiled modules keyed by `(project_id, content_hash)`.
///
/// No TTL or explicit invalidation; entries are only ever superseded by new
/// hashes.
pub trait ModuleCache {
    /// Fetch the module text for a key, if cached.
    fn get(&self, project_id: &str, hash: ContentHash) -> StageResult<Option<String>>;

    /// Store module text under a key. Overwriting an identical key is allowed
    /// (background refresh rewrites the same entry).
    fn put(&mut self, project_id: &str, hash: ContentHash, module_text: &str) -> StageResult<()>;
}

/// In-memory cache, used in tests and as a session-local fast path.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: BTreeMap<(String, ContentHash), String>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ModuleCache for MemoryCache {
    fn get(&self, project_id: &str, hash: ContentHash) -> StageResult<Option<String>> {
        Ok(self
            .entries
            .get(&(project_id.to_string(), hash))
            .cloned())
    }

    fn put(&mut self, project_id: &str, hash: ContentHash, module_text: &str) -> StageResult<()> {
        self.entries
            .insert((project_id.to_string(), hash), module_text.to_string());
        Ok(())
    }
}

/// Disk-backed cache writing one JSON file per entry.
///
/// Survives editor sessions; the filename carries both key components so
/// lookups never have to scan the directory.
#[derive(Debug)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    /// Open (and create if missing) a cache rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| StageError::cache(format!("create {}: {e}", root.display())))?;
        Ok(Self { root })
    }

    fn entry_path(&self, project_id: &str, hash: ContentHash) -> PathBuf {
        // Project ids are caller-provided; keep only filename-safe chars.
        let safe: String = project_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.root.join(format!("{safe}-{hash}.json"))
    }
}

impl ModuleCache for DiskCache {
    fn get(&self, project_id: &str, hash: ContentHash) -> StageResult<Option<String>> {
        let path = self.entry_path(project_id, hash);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StageError::cache(format!("read {}: {e}", path.display()))),
        };
        let entry: CacheEntry = serde_json::from_slice(&bytes)
            .map_err(|e| StageError::serde(format!("cache entry {}: {e}", path.display())))?;
        Ok(Some(entry.module_text))
    }

    fn put(&mut self, project_id: &str, hash: ContentHash, module_text: &str) -> StageResult<()> {
        let entry = CacheEntry {
            project_id: project_id.to_string(),
            content_hash: hash,
            module_text: module_text.to_string(),
            stored_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };
        let path = self.entry_path(project_id, hash);
        let json = serde_json::to_vec(&entry)
            .map_err(|e| StageError::serde(format!("cache entry: {e}")))?;
        fs::write(&path, json)
            .map_err(|e| StageError::cache(format!("write {}: {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/cache.rs"]
mod tests;
