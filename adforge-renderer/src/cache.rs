//! Decoded image source cache.
//!
//! Each distinct source string is decoded once and kept until it is the least
//! recently used entry of a full cache. Failed loads are not cached, so a
//! later render retries them.

use std::collections::HashMap;
use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::error::RenderResult;
use crate::image::{decode_image, load_source_bytes};

#[derive(Debug)]
struct CacheEntry {
    pixmap: Arc<Pixmap>,
    /// Logical clock of the last access.
    last_used: u64,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of evictions.
    pub evictions: u64,
}

/// LRU cache of decoded sources, keyed by the source string.
#[derive(Debug)]
pub struct SourceCache {
    entries: HashMap<String, CacheEntry>,
    capacity: usize,
    clock: u64,
    stats: CacheStats,
}

impl SourceCache {
    /// A cache holding at most `capacity` decoded sources.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    /// Get a decoded source if cached.
    pub fn get(&mut self, key: &str) -> Option<Arc<Pixmap>> {
        self.clock += 1;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_used = self.clock;
            self.stats.hits += 1;
            Some(Arc::clone(&entry.pixmap))
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Insert a decoded pixmap under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, pixmap: Pixmap) -> Arc<Pixmap> {
        let key = key.into();
        self.clock += 1;
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                self.evict_lru();
            }
        }
        let pixmap = Arc::new(pixmap);
        self.entries.insert(
            key,
            CacheEntry {
                pixmap: Arc::clone(&pixmap),
                last_used: self.clock,
            },
        );
        pixmap
    }

    /// Decode pre-fetched bytes (a download or a generation result) and cache
    /// them under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not decode.
    pub fn insert_bytes(&mut self, key: impl Into<String>, bytes: &[u8]) -> RenderResult<()> {
        let pixmap = decode_image(bytes)?;
        self.insert(key, pixmap);
        Ok(())
    }

    /// Get a cached source or load and decode it.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or decoded.
    pub fn get_or_load(&mut self, src: &str) -> RenderResult<Arc<Pixmap>> {
        if let Some(pixmap) = self.get(src) {
            return Ok(pixmap);
        }
        let pixmap = decode_image(&load_source_bytes(src)?)?;
        tracing::debug!(
            width = pixmap.width(),
            height = pixmap.height(),
            "image source decoded"
        );
        Ok(self.insert(src, pixmap))
    }

    /// Check if a source is cached.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a source.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every cached source.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics.
    #[must_use]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new(64)
    }
}
