//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use attendance_store::{AttendeeDirectory, ScanLedger, SessionStore};
use reconciler::{Aggregator, ProcessorConfig, ScanProcessor, SessionController};

/// Interval for dropping idle per-pair locks.
const LOCK_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Scan processing pipeline
    pub processor: Arc<ScanProcessor>,
    /// Scan session controller
    pub sessions: Arc<SessionController>,
    /// Event/attendee statistics
    pub aggregator: Arc<Aggregator>,
    /// Ledger, for direct history reads
    pub ledger: Arc<dyn ScanLedger>,
    /// Attendee directory, for direct state reads
    pub directory: Arc<dyn AttendeeDirectory>,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn AttendeeDirectory>,
        ledger: Arc<dyn ScanLedger>,
        session_store: Arc<dyn SessionStore>,
        config: ProcessorConfig,
    ) -> Self {
        let sessions = Arc::new(SessionController::new(session_store));
        let processor = Arc::new(ScanProcessor::new(
            directory.clone(),
            ledger.clone(),
            sessions.clone(),
            config,
        ));
        let aggregator = Arc::new(Aggregator::new(directory.clone(), ledger.clone()));

        Self {
            processor,
            sessions,
            aggregator,
            ledger,
            directory,
        }
    }

    /// Start the pair-lock cleanup background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_lock_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let processor = self.processor.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(LOCK_CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                processor.locks().cleanup_idle();
            }
        })
    }
}
