//! Common test setup functions.

use api::{router, state::AppState};
use attendance_core::{Attendee, ReconcilePolicy};
use attendance_store::{MemoryDirectory, MemorySessionStore};
use axum::Router;
use reconciler::ProcessorConfig;
use std::sync::Arc;

use crate::mocks::FlakyLedger;

/// Test context running the full router over in-memory stores.
///
/// Uses the same production code paths: the real Axum router with all
/// middleware, the real processor, and the seedable in-memory directory.
/// The ledger is the [`FlakyLedger`] so tests can inject append faults.
pub struct TestContext {
    pub directory: Arc<MemoryDirectory>,
    pub ledger: Arc<FlakyLedger>,
    pub router: Router,
}

impl TestContext {
    /// Create a test context with the default policy.
    pub fn new() -> Self {
        Self::with_policy(ReconcilePolicy::default())
    }

    /// Create a test context with a custom reconciliation policy.
    pub fn with_policy(policy: ReconcilePolicy) -> Self {
        let directory = Arc::new(MemoryDirectory::new());
        let ledger = Arc::new(FlakyLedger::new());
        let session_store = Arc::new(MemorySessionStore::new());

        let config = ProcessorConfig {
            policy,
            ..ProcessorConfig::default()
        };

        let state = AppState::new(
            directory.clone(),
            ledger.clone(),
            session_store,
            config,
        );
        let router = router(state);

        Self {
            directory,
            ledger,
            router,
        }
    }

    /// Seed one attendee into an event's roster.
    pub fn seed(&self, event_id: &str, attendee: Attendee) {
        self.directory.seed(event_id, attendee);
    }

    /// Total scans recorded in the ledger.
    pub fn scan_count(&self) -> usize {
        self.ledger.scan_count()
    }

    /// Set the ledger to fail appends (for error testing).
    pub fn set_ledger_failure(&self, should_fail: bool) {
        self.ledger.set_should_fail(should_fail);
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
