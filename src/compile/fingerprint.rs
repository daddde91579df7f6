use std::collections::BTreeMap;
use std::fmt;

use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x51a9_e0c3_7b2d_4f86;

/// Stable content hash of an override set, used as the module-cache key.
///
/// Order-independent: any two maps with the same `(path, source)` pairs hash
/// identically regardless of insertion history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct ContentHash {
    /// High 64 bits of the xxh3-128 digest.
    pub hi: u64,
    /// Low 64 bits of the xxh3-128 digest.
    pub lo: u64,
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Compute the content hash of a named override set.
///
/// `BTreeMap` iteration is already sorted by path, which gives the
/// order-independence the cache key requires. Lengths are written before
/// payloads so `("ab", "c")` and `("a", "bc")` cannot collide.
pub fn fingerprint_overrides(overrides: &BTreeMap<String, String>) -> ContentHash {
    let mut h = Xxh3::with_seed(XXH3_SEED);
    h.update(&(overrides.len() as u64).to_le_bytes());
    for (path, source) in overrides {
        h.update(&(path.len() as u64).to_le_bytes());
        h.update(path.as_bytes());
        h.update(&(source.len() as u64).to_le_bytes());
        h.update(source.as_bytes());
    }
    let v = h.digest128();
    ContentHash {
        hi: (v >> 64) as u64,
        lo: v as u64,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
