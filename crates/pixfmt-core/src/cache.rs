//! The fish-cache persistence boundary (§4.8).
//!
//! The on-disk file format is explicitly out of scope — this module only
//! defines the load/store contract a future format-specific backend would
//! implement, plus the no-op default used when no backend is configured.

use crate::error::Result;

/// A source/destination format name pair used as a cache key by backends.
/// Backends are free to hash or encode this however their storage demands.
pub type FishKey = (String, String);

/// Persists planned fishes across process runs. `load`/`store` operate on
/// opaque blobs; a backend is responsible for its own serialization.
pub trait FishCacheBackend: Send + Sync {
    /// Look up a previously stored plan blob for `key`. `Ok(None)` means no
    /// entry exists yet, which is not an error.
    fn load(&self, key: &FishKey) -> Result<Option<Vec<u8>>>;

    /// Persist a plan blob for `key`, overwriting any prior entry.
    fn store(&self, key: &FishKey, blob: &[u8]) -> Result<()>;
}

/// The default backend: every lookup misses, every store is discarded.
/// `Registry`/`planner` fall back to this when `Config::inhibit_cache` is
/// set or no backend has been configured, so the engine always has a valid
/// (if unhelpful) cache to consult.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl FishCacheBackend for NullCache {
    fn load(&self, _key: &FishKey) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn store(&self, _key: &FishKey, _blob: &[u8]) -> Result<()> {
        Ok(())
    }
}
