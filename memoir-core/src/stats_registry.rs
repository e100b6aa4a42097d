//! Process-wide registry of named cache statistics.
//!
//! `#[memoized]` registers the statistics of every function-private global
//! cache under the function name (or the `name` attribute) the first time
//! the function runs. Dynamic memoizers can register themselves with
//! [`register`].
//!
//! ```
//! use memoir_core::{stats_registry, CacheStats};
//! use std::sync::Arc;
//!
//! let stats = Arc::new(CacheStats::new());
//! stats_registry::register("lookup_user", Arc::clone(&stats));
//! stats.record_hit();
//!
//! let seen = stats_registry::get("lookup_user").unwrap();
//! assert_eq!(seen.hits(), 1);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::CacheStats;

static STATS_REGISTRY: Lazy<RwLock<HashMap<String, Arc<CacheStats>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

// Bumped by `clear`. Starts at 1 so that 0 can mean "never registered".
static GENERATION: AtomicU64 = AtomicU64::new(1);

/// Registers `stats` under `name`, replacing any previous registration.
pub fn register(name: &str, stats: Arc<CacheStats>) {
    tracing::debug!(cache = name, "registering cache statistics");
    STATS_REGISTRY.write().insert(name.to_string(), stats);
}

/// Live handle to the statistics registered under `name`.
pub fn get(name: &str) -> Option<Arc<CacheStats>> {
    STATS_REGISTRY.read().get(name).cloned()
}

/// Names of every registered cache, in no particular order.
pub fn list() -> Vec<String> {
    STATS_REGISTRY.read().keys().cloned().collect()
}

/// Zeroes the counters registered under `name`.
///
/// Returns `false` if nothing is registered under that name.
pub fn reset(name: &str) -> bool {
    match STATS_REGISTRY.read().get(name) {
        Some(stats) => {
            stats.reset();
            true
        }
        None => false,
    }
}

/// Drops every registration. Counters held elsewhere are left untouched.
///
/// `#[memoized]` functions register again on their next call.
pub fn clear() {
    let mut registry = STATS_REGISTRY.write();
    registry.clear();
    GENERATION.fetch_add(1, Ordering::AcqRel);
}

/// Registers `stats` under `name` unless `registered` already holds the
/// current generation, i.e. unless it was registered since the last
/// [`clear`].
pub(crate) fn register_once(name: &str, stats: &Arc<CacheStats>, registered: &AtomicU64) {
    let generation = GENERATION.load(Ordering::Acquire);
    if registered.load(Ordering::Acquire) != generation {
        register(name, Arc::clone(stats));
        registered.store(generation, Ordering::Release);
    }
}
