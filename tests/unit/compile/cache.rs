use super::*;

use crate::compile::fingerprint::fingerprint_overrides;

fn hash_of(text: &str) -> ContentHash {
    let mut m = BTreeMap::new();
    m.insert("a.tsx".to_string(), text.to_string());
    fingerprint_overrides(&m)
}

#[test]
fn memory_cache_round_trips() {
    let mut cache = MemoryCache::new();
    let h = hash_of("1");
    assert_eq!(cache.get("p1", h).unwrap(), None);
    cache.put("p1", h, "module text").unwrap();
    assert_eq!(cache.get("p1", h).unwrap().as_deref(), Some("module text"));
}

#[test]
fn memory_cache_keys_by_project_and_hash() {
    let mut cache = MemoryCache::new();
    let h = hash_of("1");
    cache.put("p1", h, "m1").unwrap();
    assert_eq!(cache.get("p2", h).unwrap(), None);
    assert_eq!(cache.get("p1", hash_of("2")).unwrap(), None);
}

#[test]
fn disk_cache_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = DiskCache::open(dir.path()).unwrap();
    let h = hash_of("1");
    assert_eq!(cache.get("p1", h).unwrap(), None);
    cache.put("p1", h, "module text").unwrap();
    assert_eq!(cache.get("p1", h).unwrap().as_deref(), Some("module text"));
}

#[test]
fn disk_cache_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let h = hash_of("1");
    {
        let mut cache = DiskCache::open(dir.path()).unwrap();
        cache.put("p1", h, "survivor").unwrap();
    }
    let cache = DiskCache::open(dir.path()).unwrap();
    assert_eq!(cache.get("p1", h).unwrap().as_deref(), Some("survivor"));
}

#[test]
fn new_hash_supersedes_without_touching_old_entry() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = DiskCache::open(dir.path()).unwrap();
    let h1 = hash_of("1");
    let h2 = hash_of("2");
    cache.put("p1", h1, "old").unwrap();
    cache.put("p1", h2, "new").unwrap();
    // Both entries coexist; nothing is invalidated explicitly.
    assert_eq!(cache.get("p1", h1).unwrap().as_deref(), Some("old"));
    assert_eq!(cache.get("p1", h2).unwrap().as_deref(), Some("new"));
}

#[test]
fn awkward_project_ids_become_safe_filenames() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = DiskCache::open(dir.path()).unwrap();
    let h = hash_of("1");
    cache.put("proj/../weird id", h, "m").unwrap();
    assert_eq!(cache.get("proj/../weird id", h).unwrap().as_deref(), Some("m"));
}
