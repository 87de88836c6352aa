//! Append-only scan ledger.
//!
//! The ledger is the source of truth for attendance: scans are appended
//! exactly once and never mutated, and within a (badge, event) pair
//! insertion order is event order. Attendance state is always derived
//! by replaying the pair's events.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use attendance_core::{PairKey, Result, ScanEvent};

/// Append-only persistence for accepted scans.
///
/// Any store with per-key atomic read-modify-write satisfies this
/// contract; serialization of same-pair writers is the caller's job.
#[async_trait]
pub trait ScanLedger: Send + Sync {
    /// Appends one accepted scan.
    async fn append(&self, scan: ScanEvent) -> Result<()>;

    /// Ordered scans for one (badge, event) pair, oldest first.
    async fn events_for_pair(&self, key: &PairKey) -> Result<Vec<ScanEvent>>;

    /// The most recent scans for an event, newest first.
    async fn recent_for_event(&self, event_id: &str, limit: usize) -> Result<Vec<ScanEvent>>;

    /// All pair keys with at least one scan for an event.
    async fn pairs_for_event(&self, event_id: &str) -> Result<Vec<PairKey>>;

    /// Whether the ledger backend is reachable.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// In-memory ledger keyed by (badge, event) pair.
#[derive(Default)]
pub struct MemoryLedger {
    by_pair: RwLock<HashMap<PairKey, Vec<ScanEvent>>>,
    by_event: RwLock<HashMap<String, Vec<ScanEvent>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total scans across all pairs, for tests and metrics.
    pub fn len(&self) -> usize {
        self.by_pair.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ScanLedger for MemoryLedger {
    async fn append(&self, scan: ScanEvent) -> Result<()> {
        let key = scan.pair_key();

        self.by_event
            .write()
            .entry(scan.event_id.clone())
            .or_default()
            .push(scan.clone());
        self.by_pair.write().entry(key).or_default().push(scan);

        Ok(())
    }

    async fn events_for_pair(&self, key: &PairKey) -> Result<Vec<ScanEvent>> {
        Ok(self.by_pair.read().get(key).cloned().unwrap_or_default())
    }

    async fn recent_for_event(&self, event_id: &str, limit: usize) -> Result<Vec<ScanEvent>> {
        let by_event = self.by_event.read();
        let scans = match by_event.get(event_id) {
            Some(scans) => scans,
            None => return Ok(Vec::new()),
        };

        Ok(scans.iter().rev().take(limit).cloned().collect())
    }

    async fn pairs_for_event(&self, event_id: &str) -> Result<Vec<PairKey>> {
        Ok(self
            .by_pair
            .read()
            .keys()
            .filter(|k| k.event_id == event_id)
            .cloned()
            .collect())
    }
}
