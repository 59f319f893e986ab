//! Capacity- and time-bounded caches keyed by canonical path
//!
//! The resolver owns two independent [`TtlCache`] instances: one for merged
//! template trees and one for raw resource bytes. Entries expire a fixed
//! duration after write (reads do not extend life) and the least recently
//! used entry is evicted when the cache is full. Stored values are replaced
//! wholesale, never patched, so concurrent readers never observe a
//! half-updated entry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::namespace::CanonicalPath;

/// Configuration for the two resolver caches
///
/// Defaults match the reference deployment: template definitions are stable
/// for a day, binary resources for half a day.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Expire-after-write TTL for merged template trees
    pub template_ttl: Duration,
    /// Maximum number of cached templates
    pub template_capacity: usize,
    /// Expire-after-write TTL for raw resource bytes
    pub resource_ttl: Duration,
    /// Maximum number of cached resources
    pub resource_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            template_ttl: Duration::from_secs(24 * 60 * 60),
            template_capacity: 500,
            resource_ttl: Duration::from_secs(12 * 60 * 60),
            resource_capacity: 200,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template-cache TTL
    pub fn with_template_ttl(mut self, ttl: Duration) -> Self {
        self.template_ttl = ttl;
        self
    }

    /// Set the template-cache capacity
    pub fn with_template_capacity(mut self, capacity: usize) -> Self {
        self.template_capacity = capacity;
        self
    }

    /// Set the resource-cache TTL
    pub fn with_resource_ttl(mut self, ttl: Duration) -> Self {
        self.resource_ttl = ttl;
        self
    }

    /// Set the resource-cache capacity
    pub fn with_resource_capacity(mut self, capacity: usize) -> Self {
        self.resource_capacity = capacity;
        self
    }
}

struct Entry<V> {
    value: V,
    written_at: Instant,
    last_used: Instant,
}

struct Inner<V> {
    entries: HashMap<CanonicalPath, Entry<V>>,
}

/// A concurrent map with expire-after-write TTL and LRU capacity eviction
///
/// A miss followed by a concurrent duplicate computation is acceptable; both
/// computations are individually correct and the later `put` replaces the
/// earlier one wholesale.
pub struct TtlCache<V> {
    inner: Mutex<Inner<V>>,
    ttl: Duration,
    capacity: usize,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache with the given capacity and expire-after-write TTL
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
            }),
            ttl,
            capacity,
        }
    }

    /// Look up an unexpired entry
    pub fn get(&self, key: &CanonicalPath) -> Option<V> {
        let now = Instant::now();
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        let expired = match inner.entries.get(key) {
            Some(entry) => now.duration_since(entry.written_at) >= self.ttl,
            None => return None,
        };
        if expired {
            inner.entries.remove(key);
            return None;
        }

        let entry = inner.entries.get_mut(key).expect("entry checked above");
        entry.last_used = now;
        Some(entry.value.clone())
    }

    /// Insert or replace the entry for a key
    pub fn put(&self, key: CanonicalPath, value: V) {
        if self.capacity == 0 {
            return;
        }

        let now = Instant::now();
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            evict_one(&mut inner, now, self.ttl);
        }

        inner.entries.insert(
            key,
            Entry {
                value,
                written_at: now,
                last_used: now,
            },
        );
    }

    /// Drop the entry for a key, if present
    pub fn invalidate(&self, key: &CanonicalPath) {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .entries
            .remove(key);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .entries
            .clear();
    }

    /// Number of entries, including any not yet expired lazily
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Remove the expired-or-least-recently-used entry to make room
fn evict_one<V>(inner: &mut Inner<V>, now: Instant, ttl: Duration) {
    // Prefer evicting an expired entry; otherwise the coldest one.
    let victim = inner
        .entries
        .iter()
        .min_by_key(|(_, e)| {
            let expired = now.duration_since(e.written_at) >= ttl;
            (!expired, e.last_used)
        })
        .map(|(k, _)| k.clone());

    if let Some(key) = victim {
        inner.entries.remove(&key);
    }
}
