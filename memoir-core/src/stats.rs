use std::sync::atomic::{AtomicU64, Ordering};

/// Hit/miss counters of one cache store.
///
/// Counters use relaxed atomics: totals are exact once all callers are done,
/// but a reader racing with writers may see hits and misses from slightly
/// different moments.
///
/// # Examples
///
/// ```
/// use memoir_core::CacheStats;
///
/// let stats = CacheStats::new();
/// stats.record_miss();
/// stats.record_hit();
/// stats.record_hit();
///
/// assert_eq!(stats.total_accesses(), 3);
/// assert!((stats.hit_rate() - 0.6666).abs() < 0.001);
/// ```
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_accesses(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// Fraction of lookups that were hits, `0.0` when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        self.ratio(self.hits())
    }

    /// Fraction of lookups that were misses, `0.0` when nothing was looked up.
    pub fn miss_rate(&self) -> f64 {
        self.ratio(self.misses())
    }

    fn ratio(&self, part: u64) -> f64 {
        match self.total_accesses() {
            0 => 0.0,
            total => part as f64 / total as f64,
        }
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Cloning takes a snapshot; the clone counts independently afterwards.
impl Clone for CacheStats {
    fn clone(&self) -> Self {
        Self {
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
        }
    }
}
