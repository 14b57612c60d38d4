// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Compiled template caching.
//!
//! Parsing a theme template is far more expensive than rendering it, so the
//! engine keeps compiled [`Template`]s keyed by name. Each entry carries the
//! hash of the source it was built from; a changed source is a cache miss.
//!
//! # Cache Implementations
//!
//! - [`MemoryCache`]: in-memory LRU cache
//! - [`NoOpCache`]: never stores anything, for theme development

use crate::ast::Template;
use crate::error::{PlumeError, Result};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Trait for compiled template caches.
pub trait Cache: Send + Sync + std::fmt::Debug {
    /// Retrieves a template from the cache.
    fn get(&self, key: &str) -> Result<Option<Arc<Template>>>;
    /// Stores a template in the cache.
    fn set(&self, key: &str, template: Arc<Template>) -> Result<()>;
    /// Removes a template from the cache.
    fn remove(&self, key: &str) -> Result<()>;
    /// Clears all cached templates.
    fn clear(&self) -> Result<()>;
    /// Checks if a key exists in the cache.
    fn contains_key(&self, key: &str) -> bool;
    /// Creates a boxed clone.
    fn clone_box(&self) -> Box<dyn Cache>;

    /// Returns the cached template only if it was compiled from source with `source_hash`.
    fn get_fresh(&self, key: &str, source_hash: u64) -> Result<Option<Arc<Template>>> {
        Ok(self
            .get(key)?
            .filter(|template| template.source_hash == source_hash))
    }
}

impl Clone for Box<dyn Cache> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// In-memory LRU (Least Recently Used) cache.
///
/// ```rust,ignore
/// use plume::MemoryCache;
///
/// let cache = MemoryCache::new(100);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryCache {
    cache: Arc<Mutex<LruCache<String, Arc<Template>>>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `capacity` templates (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, LruCache<String, Arc<Template>>>> {
        self.cache
            .lock()
            .map_err(|_| PlumeError::CacheError("Failed to acquire cache lock".to_string()))
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Arc<Template>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, template: Arc<Template>) -> Result<()> {
        self.lock()?.put(key.to_string(), template);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.pop(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn contains_key(&self, key: &str) -> bool {
        self.lock().map(|cache| cache.contains(key)).unwrap_or(false)
    }

    fn clone_box(&self) -> Box<dyn Cache> {
        Box::new(Self {
            cache: Arc::clone(&self.cache),
        })
    }
}

/// No-op cache that never stores or retrieves anything.
#[derive(Debug, Clone, Default)]
pub struct NoOpCache;

impl NoOpCache {
    /// Creates a new no-op cache.
    pub fn new() -> Self {
        Self
    }
}

impl Cache for NoOpCache {
    fn get(&self, _key: &str) -> Result<Option<Arc<Template>>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _template: Arc<Template>) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        Ok(())
    }

    fn contains_key(&self, _key: &str) -> bool {
        false
    }

    fn clone_box(&self) -> Box<dyn Cache> {
        Box::new(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;

    fn template(name: &str, hash: u64) -> Arc<Template> {
        let mut template = Template::new(name, vec![Node::text(name)]);
        template.source_hash = hash;
        Arc::new(template)
    }

    #[test]
    fn test_memory_cache_evicts_least_recently_used() {
        let cache = MemoryCache::new(2);
        cache.set("a", template("a", 1)).unwrap();
        cache.set("b", template("b", 2)).unwrap();
        cache.get("a").unwrap();
        cache.set("c", template("c", 3)).unwrap();

        assert!(cache.contains_key("a"));
        assert!(!cache.contains_key("b"));
        assert!(cache.contains_key("c"));
    }

    #[test]
    fn test_stale_entries_are_misses() {
        let cache = MemoryCache::new(4);
        cache.set("post", template("post", 10)).unwrap();
        assert!(cache.get_fresh("post", 10).unwrap().is_some());
        assert!(cache.get_fresh("post", 11).unwrap().is_none());
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = MemoryCache::new(4);
        let boxed: Box<dyn Cache> = cache.clone_box();
        boxed.set("x", template("x", 0)).unwrap();
        assert!(cache.contains_key("x"));
        cache.clear().unwrap();
        assert!(!boxed.contains_key("x"));
    }

    #[test]
    fn test_noop_cache_stores_nothing() {
        let cache = NoOpCache::new();
        cache.set("x", template("x", 0)).unwrap();
        assert!(cache.get("x").unwrap().is_none());
    }
}
