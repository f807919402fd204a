//! Unbounded in-memory tile store backed by `dashmap`.
//!
//! Entries live until the store is dropped. There is no eviction, so memory
//! grows with the number of distinct tiles fetched.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::traits::{CacheStats, StoreError, TileStore};
use super::CacheKey;

/// In-memory map from cache key to encoded tile bytes.
///
/// The map is sharded internally, so concurrent fetchers can read and write
/// without an outer lock.
#[derive(Debug, Default)]
pub struct MemoryTileStore {
    tiles: DashMap<CacheKey, Vec<u8>>,
    /// Statistics - atomics for lock-free updates
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryTileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.tiles.contains_key(key)
    }

    /// Total size of all stored values in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.tiles.iter().map(|entry| entry.value().len() as u64).sum()
    }
}

impl TileStore for MemoryTileStore {
    fn get(&self, key: &CacheKey) -> Option<Vec<u8>> {
        match self.tiles.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn set(&self, key: CacheKey, value: Vec<u8>) -> Result<(), StoreError> {
        self.tiles.insert(key, value);
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.tiles.len() as u64,
            size_bytes: self.size_bytes(),
        }
    }
}
