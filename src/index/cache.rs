use std::sync::Arc;

use tracing::debug;

use super::Group;

/// Lookups between two purges of stale entries.
pub const CLEANUP_INTERVAL: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub end_key: i64,
    pub amount: usize,
    pub group_size: i64,
}

#[derive(Debug)]
struct CacheItem {
    key: CacheKey,
    generation: u64,
    groups: Arc<[Group]>,
}

/// Memoizes group lists until the index is written to again.
#[derive(Debug, Default)]
pub struct GroupCache {
    items: Vec<CacheItem>,
    lookups: usize,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key` if it was stored at `generation`.
    pub fn get(&mut self, key: &CacheKey, generation: u64) -> Option<Arc<[Group]>> {
        self.lookups += 1;
        if self.lookups % CLEANUP_INTERVAL == 0 {
            self.cleanup(generation);
        }

        self.items
            .iter()
            .find(|item| item.key == *key && item.generation == generation)
            .map(|item| item.groups.clone())
    }

    /// Stores `groups`, replacing any older entry for the same key.
    pub fn add(&mut self, key: CacheKey, generation: u64, groups: Arc<[Group]>) {
        self.items.retain(|item| item.key != key);
        self.items.push(CacheItem {
            key,
            generation,
            groups,
        });
    }

    /// Drops every entry older than `generation`.
    pub fn cleanup(&mut self, generation: u64) {
        let before = self.items.len();
        self.items.retain(|item| item.generation >= generation);
        let removed = before - self.items.len();
        if removed > 0 {
            debug!(removed, remaining = self.items.len(), "group cache cleanup");
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
