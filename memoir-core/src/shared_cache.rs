use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{CacheStore, CallSignature};

#[cfg(feature = "stats")]
use crate::CacheStats;

/// A thread-safe store shared by every clone of the handle.
///
/// `SharedCache` is the default store of [`memoized`](crate::memoized) and of
/// `#[memoized]` functions with global scope. Cloning the handle does not
/// copy entries: all clones see one map, which is how a single cache is
/// handed to several memoized callables or kept around for inspection.
///
/// # Thread Safety
///
/// The map sits behind a `parking_lot::RwLock`. Lookups take the read lock
/// and may run concurrently; inserts take the write lock. No lock is held
/// while the wrapped function runs, so two threads missing on the same
/// signature both compute and the later insert wins.
///
/// # Examples
///
/// ```
/// use memoir_core::{CacheStore, CallSignature, Key, SharedCache};
///
/// let cache: SharedCache<String> = SharedCache::new();
/// let handle = cache.clone();
///
/// let sig = CallSignature::from_keys(vec![Key::Int(1)]);
/// cache.insert(sig.clone(), "one".to_string());
///
/// assert_eq!(handle.get(&sig), Some("one".to_string()));
/// assert_eq!(handle.len(), 1);
/// ```
pub struct SharedCache<V> {
    map: Arc<RwLock<HashMap<CallSignature, V>>>,
    #[cfg(feature = "stats")]
    stats: Arc<CacheStats>,
}

impl<V> SharedCache<V> {
    pub fn new() -> Self {
        Self {
            map: Arc::new(RwLock::new(HashMap::new())),
            #[cfg(feature = "stats")]
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Hit/miss counters of this store. Every [`CacheStore::get`] counts
    /// once; `contains` does not count.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &Arc<CacheStats> {
        &self.stats
    }

    /// Signatures currently stored, in no particular order.
    pub fn signatures(&self) -> Vec<CallSignature> {
        self.map.read().keys().cloned().collect()
    }

    /// Returns `true` if both handles point at the same map.
    pub fn same_cache(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.map, &other.map)
    }
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            map: Arc::clone(&self.map),
            #[cfg(feature = "stats")]
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<V> Default for SharedCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for SharedCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache")
            .field("entries", &self.map.read().len())
            .finish()
    }
}

impl<V: Clone> CacheStore<V> for SharedCache<V> {
    fn get(&self, signature: &CallSignature) -> Option<V> {
        let found = self.map.read().get(signature).cloned();

        #[cfg(feature = "stats")]
        {
            if found.is_some() {
                self.stats.record_hit();
            } else {
                self.stats.record_miss();
            }
        }

        found
    }

    fn insert(&self, signature: CallSignature, value: V) {
        self.map.write().insert(signature, value);
    }

    fn contains(&self, signature: &CallSignature) -> bool {
        self.map.read().contains_key(signature)
    }

    fn remove(&self, signature: &CallSignature) -> Option<V> {
        self.map.write().remove(signature)
    }

    fn len(&self) -> usize {
        self.map.read().len()
    }

    fn clear(&self) {
        self.map.write().clear();
    }
}
