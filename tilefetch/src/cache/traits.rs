//! Core trait for tile byte storage.
//!
//! # Design Principles
//!
//! - **Raw bytes**: values are the encoded tile exactly as downloaded
//! - **Overwrite semantics**: the last `set` for a key wins
//! - **Thread safety**: implementations are `Send + Sync` and need no
//!   external locking

use std::fmt;

use thiserror::Error;

use super::CacheKey;

/// Errors that can occur while storing a tile.
///
/// The in-memory store never produces these. They exist so stores that can
/// fail share the same interface; fetchers log them instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store refused the entry.
    #[error("Store rejected '{key}': {reason}")]
    Rejected { key: String, reason: String },
}

/// Cache statistics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Number of stored entries.
    pub entries: u64,
    /// Total size of stored values in bytes.
    pub size_bytes: u64,
}

impl CacheStats {
    /// Fraction of lookups that were hits, `0.0` when there were none.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} bytes, {} hits, {} misses ({:.1}% hit rate)",
            self.entries,
            self.size_bytes,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )
    }
}

/// Key-value storage for encoded tiles.
pub trait TileStore: Send + Sync {
    /// Returns a copy of the bytes stored under `key`.
    fn get(&self, key: &CacheKey) -> Option<Vec<u8>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: CacheKey, value: Vec<u8>) -> Result<(), StoreError>;

    /// Current statistics.
    fn stats(&self) -> CacheStats;
}
