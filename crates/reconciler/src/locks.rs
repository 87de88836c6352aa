//! Per-pair scan serialization.
//!
//! Two near-simultaneous scans for the same (badge, event) pair must
//! not both validate against a stale state. Each pair gets its own
//! async mutex held across validate-then-append; scans for different
//! pairs proceed in parallel.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use attendance_core::PairKey;

/// Registry of per-pair async locks.
#[derive(Default)]
pub struct PairLocks {
    inner: Mutex<HashMap<PairKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for a pair, creating it on first use.
    ///
    /// The caller holds the returned handle across its critical section;
    /// the registry lock itself is only held for the map access.
    pub fn acquire(&self, key: &PairKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut inner = self.inner.lock();
        inner
            .entry(key.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drops locks nobody currently holds.
    pub fn cleanup_idle(&self) {
        let mut inner = self.inner.lock();
        // strong_count == 1 means only the registry holds it.
        inner.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of registered locks, for tests and metrics.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
