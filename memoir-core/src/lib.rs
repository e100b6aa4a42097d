//! # Memoir Core
//!
//! Building blocks of the memoir memoization library.
//!
//! ## Module Organization
//!
//! - [`value`] - dynamic argument values and their hashable [`Key`] projection
//! - [`signature`] - call arguments and the canonical [`CallSignature`] cache key
//! - [`store`] - the [`CacheStore`] trait every backing mapping implements
//! - [`shared_cache`] - thread-safe store shared by handle clones
//! - [`thread_local_cache`] - per-thread store over `thread_local!` storage
//! - [`memoize`] - the memoizer: [`memoized`] and [`memoized_into`]
//! - [`property`] - [`MemoizedProperty`], a per-instance lazily computed value
//! - [`stats_registry`] - named hit/miss statistics (`stats` feature)
//!
//! ## Quick Start
//!
//! ```
//! use memoir_core::{args, memoized, Args};
//!
//! let slow_square = memoized(|a: &Args| {
//!     let n = a.get(0).and_then(|v| v.as_int()).unwrap_or(0);
//!     n * n
//! });
//!
//! assert_eq!(slow_square.call(&args![12]).unwrap(), 144);
//! assert_eq!(slow_square.call(&args![12]).unwrap(), 144); // cached
//! ```
mod error;
pub mod memoize;
pub mod property;
pub mod shared_cache;
pub mod signature;
pub mod store;
pub mod thread_local_cache;
pub mod value;

#[cfg(feature = "stats")]
mod stats;

#[cfg(feature = "stats")]
pub mod stats_registry;

pub use error::{ArgPosition, MemoError, MemoResult};
pub use memoize::{memoized, memoized_into, Memoized, Memoizer};
pub use property::MemoizedProperty;
pub use shared_cache::SharedCache;
pub use signature::{Args, CallSignature};
pub use store::{insert_ok, CacheStore};
pub use thread_local_cache::ThreadLocalCache;
pub use value::{Key, ToKey, Value};

#[cfg(feature = "stats")]
pub use stats::CacheStats;

#[doc(hidden)]
pub mod __private {
    pub use once_cell;

    use std::sync::atomic::AtomicU64;

    use crate::SharedCache;

    /// Registers the statistics of a macro-generated cache, again after
    /// each `stats_registry::clear`.
    #[cfg(feature = "stats")]
    pub fn register_stats<V>(name: &str, cache: &SharedCache<V>, registered: &AtomicU64) {
        crate::stats_registry::register_once(name, cache.stats(), registered);
    }

    #[cfg(not(feature = "stats"))]
    pub fn register_stats<V>(_name: &str, _cache: &SharedCache<V>, _registered: &AtomicU64) {}
}
