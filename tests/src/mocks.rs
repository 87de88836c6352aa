//! Mock implementations for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use attendance_core::{Error, PairKey, Result, ScanEvent, StoreErrorCode};
use attendance_store::{MemoryLedger, ScanLedger};

/// Ledger wrapper with a failure switch.
///
/// Implements the same `ScanLedger` trait as the real stores, so tests
/// can verify error handling on the append path without touching the
/// production code. Reads keep working in failure mode; only appends
/// fail, mirroring a store that lost write capacity.
#[derive(Clone)]
pub struct FlakyLedger {
    inner: Arc<MemoryLedger>,
    should_fail: Arc<Mutex<bool>>,
}

impl FlakyLedger {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryLedger::new()),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Total recorded scans.
    pub fn scan_count(&self) -> usize {
        self.inner.len()
    }

    /// Set failure mode for testing error handling.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }
}

impl Default for FlakyLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScanLedger for FlakyLedger {
    async fn append(&self, scan: ScanEvent) -> Result<()> {
        if *self.should_fail.lock() {
            return Err(Error::store(
                StoreErrorCode::AppendFailed,
                "Mock ledger failure",
            ));
        }
        self.inner.append(scan).await
    }

    async fn events_for_pair(&self, key: &PairKey) -> Result<Vec<ScanEvent>> {
        self.inner.events_for_pair(key).await
    }

    async fn recent_for_event(&self, event_id: &str, limit: usize) -> Result<Vec<ScanEvent>> {
        self.inner.recent_for_event(event_id, limit).await
    }

    async fn pairs_for_event(&self, event_id: &str) -> Result<Vec<PairKey>> {
        self.inner.pairs_for_event(event_id).await
    }

    fn is_healthy(&self) -> bool {
        !*self.should_fail.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::ScanType;
    use chrono::Utc;

    #[tokio::test]
    async fn failure_mode_rejects_appends_only() {
        let ledger = FlakyLedger::new();
        let scan = ScanEvent::new("badge-001", "evt-1", ScanType::CheckIn, Utc::now());
        ledger.append(scan.clone()).await.unwrap();

        ledger.set_should_fail(true);
        let err = ledger.append(scan).await.unwrap_err();
        assert_eq!(err.error_code(), Some("STORE_001"));

        // Reads still work.
        let key = PairKey::new("badge-001", "evt-1");
        assert_eq!(ledger.events_for_pair(&key).await.unwrap().len(), 1);
        assert_eq!(ledger.scan_count(), 1);
    }
}
