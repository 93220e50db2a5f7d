//! Memoization of computed schedules.
//!
//! A cache never changes what the engine returns; it only avoids recomputing
//! a schedule for inputs that were already seen. Callers inject one
//! explicitly, and [`NoCache`] is the no-op implementation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::engine::AmortizationResult;
use super::frequency::PaymentFrequency;
use super::validation::AmortizationInputs;

/// Identity of a calculation. Decimals are normalized so that `200000` and
/// `200000.00` share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    principal: Decimal,
    annual_rate_pct: Decimal,
    term_years: u32,
    frequency: PaymentFrequency,
    start_date: Option<NaiveDate>,
}

impl CacheKey {
    pub fn from_inputs(inputs: &AmortizationInputs) -> Self {
        Self {
            principal: inputs.principal().normalize(),
            annual_rate_pct: inputs.annual_rate_pct().normalize(),
            term_years: inputs.term_years(),
            frequency: inputs.frequency(),
            start_date: inputs.start_date(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.principal, self.annual_rate_pct, self.term_years, self.frequency
        )?;
        if let Some(date) = self.start_date {
            write!(f, "-{date}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    pub hits: u64,
    pub misses: u64,
}

/// Store of computed schedules, shared between concurrent callers.
///
/// Inserting a key that is already present must be harmless: the engine is
/// deterministic, so the value written is always identical.
pub trait ScheduleCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Arc<AmortizationResult>>;

    fn insert(&self, key: CacheKey, result: Arc<AmortizationResult>);

    fn len(&self) -> usize;

    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.len(),
            ..CacheStats::default()
        }
    }
}

/// Cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ScheduleCache for NoCache {
    fn get(&self, _key: &CacheKey) -> Option<Arc<AmortizationResult>> {
        None
    }

    fn insert(&self, _key: CacheKey, _result: Arc<AmortizationResult>) {}

    fn len(&self) -> usize {
        0
    }

    fn clear(&self) {}
}

#[cfg(feature = "cache")]
pub use lru_cache::{CacheConfig, LruScheduleCache};

#[cfg(feature = "cache")]
mod lru_cache {
    use lru::LruCache;
    use parking_lot::Mutex;
    use serde::{Deserialize, Serialize};
    use std::num::NonZeroUsize;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use super::{CacheKey, CacheStats, ScheduleCache};
    use crate::amortization::engine::AmortizationResult;

    const DEFAULT_CAPACITY: usize = 256;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct CacheConfig {
        /// Maximum number of schedules retained; least recently used are evicted.
        pub capacity: usize,
    }

    impl Default for CacheConfig {
        fn default() -> Self {
            Self {
                capacity: DEFAULT_CAPACITY,
            }
        }
    }

    /// Bounded, thread-safe LRU cache of computed schedules.
    pub struct LruScheduleCache {
        entries: Mutex<LruCache<CacheKey, Arc<AmortizationResult>>>,
        capacity: NonZeroUsize,
        hits: AtomicU64,
        misses: AtomicU64,
    }

    impl LruScheduleCache {
        pub fn new(config: CacheConfig) -> Self {
            let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
            Self {
                entries: Mutex::new(LruCache::new(capacity)),
                capacity,
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
            }
        }
    }

    impl Default for LruScheduleCache {
        fn default() -> Self {
            Self::new(CacheConfig::default())
        }
    }

    impl ScheduleCache for LruScheduleCache {
        fn get(&self, key: &CacheKey) -> Option<Arc<AmortizationResult>> {
            let found = self.entries.lock().get(key).cloned();
            match found {
                Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
                None => self.misses.fetch_add(1, Ordering::Relaxed),
            };
            found
        }

        fn insert(&self, key: CacheKey, result: Arc<AmortizationResult>) {
            self.entries.lock().put(key, result);
        }

        fn len(&self) -> usize {
            self.entries.lock().len()
        }

        fn clear(&self) {
            self.entries.lock().clear();
            self.hits.store(0, Ordering::Relaxed);
            self.misses.store(0, Ordering::Relaxed);
        }

        fn stats(&self) -> CacheStats {
            CacheStats {
                size: self.len(),
                capacity: Some(self.capacity.get()),
                hits: self.hits.load(Ordering::Relaxed),
                misses: self.misses.load(Ordering::Relaxed),
            }
        }
    }
}
