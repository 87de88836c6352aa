//! The scan processing pipeline.
//!
//! One scan is one short-lived unit of work: parse token, resolve the
//! attendee, then validate-then-append under the pair lock and recompute
//! state. The structured [`ScanOutcome`] is the notification side-channel
//! the operator UI turns into a sound or toast.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};
use validator::Validate;

use attendance_core::{
    limits, AttendanceState, Attendee, BadgeToken, Error, LookupErrorCode, PairKey,
    ReconcilePolicy, RejectReason, Result, ScanEvent, ScanRequest, ScanType, StoreErrorCode,
};
use attendance_store::{AttendeeDirectory, ScanLedger};
use chrono::Utc;
use telemetry::metrics;

use crate::locks::PairLocks;
use crate::sessions::SessionController;

/// Processor tuning and policy.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub policy: ReconcilePolicy,
    /// Directory lookup timeout
    pub lookup_timeout: Duration,
    /// Ledger append timeout
    pub append_timeout: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            policy: ReconcilePolicy::default(),
            lookup_timeout: Duration::from_secs(limits::DEFAULT_LOOKUP_TIMEOUT_SECS),
            append_timeout: Duration::from_secs(limits::DEFAULT_APPEND_TIMEOUT_SECS),
        }
    }
}

/// Result of processing one scan: accepted or rejected, with the
/// attendee's actual state either way.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub accepted: bool,
    /// Rejection reason when not accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
    /// Rejection code (SCAN_00x) when not accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Operator-facing message
    pub message: String,
    /// State after the scan (or current state, when rejected)
    pub state: AttendanceState,
    /// The recorded scan, when accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanEvent>,
    /// First ever check-in for this pair
    pub first_check_in: bool,
    /// Minutes of the session closed by this scan, for check-outs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_minutes: Option<i64>,
}

impl ScanOutcome {
    fn rejected(reason: RejectReason, state: AttendanceState) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
            code: Some(reason.code()),
            message: reason.message().to_string(),
            state,
            scan: None,
            first_check_in: false,
            session_minutes: None,
        }
    }
}

/// Coordinates lookup, validation, ledger append, and state recompute.
pub struct ScanProcessor {
    directory: Arc<dyn AttendeeDirectory>,
    ledger: Arc<dyn ScanLedger>,
    sessions: Arc<SessionController>,
    locks: PairLocks,
    config: ProcessorConfig,
}

impl ScanProcessor {
    pub fn new(
        directory: Arc<dyn AttendeeDirectory>,
        ledger: Arc<dyn ScanLedger>,
        sessions: Arc<SessionController>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            directory,
            ledger,
            sessions,
            locks: PairLocks::new(),
            config,
        }
    }

    /// Handle to the pair-lock registry, for the cleanup task.
    pub fn locks(&self) -> &PairLocks {
        &self.locks
    }

    /// Processes one scan end to end.
    ///
    /// Errors are lookup misses and infrastructure faults only;
    /// business-rule violations come back as a rejected [`ScanOutcome`].
    pub async fn process(
        &self,
        request: ScanRequest,
        operator: Option<String>,
    ) -> Result<ScanOutcome> {
        let start = Instant::now();
        metrics().scans_received.inc();

        request
            .validate()
            .map_err(|e| Error::validation(e.to_string()))?;

        let scanned_at = request.scanned_at.unwrap_or_else(Utc::now);
        let now = Utc::now();
        if (scanned_at - now).num_seconds() > limits::MAX_FUTURE_SKEW_SECS {
            return Err(Error::validation(format!(
                "scan timestamp is more than {}s in the future",
                limits::MAX_FUTURE_SKEW_SECS
            )));
        }

        let token = BadgeToken::parse(&request.badge_token)?;
        let attendee = self.resolve(&token, &request.event_id).await?;

        let key = PairKey::new(attendee.badge_id.clone(), request.event_id.clone());

        // Serialize validate-then-append per pair. Scans for other
        // pairs proceed in parallel.
        let lock = self.locks.acquire(&key);
        let _guard = lock.lock().await;

        let history = self.ledger.events_for_pair(&key).await?;
        let mut state = AttendanceState::replay(&key.badge_id, &key.event_id, &history);

        if let Err(reason) = attendance_core::validate_scan(
            request.scan_type,
            &attendee,
            &state,
            &self.config.policy,
        ) {
            metrics().scans_rejected.inc();
            warn!(
                badge_id = %key.badge_id,
                event_id = %key.event_id,
                scan_type = request.scan_type.as_str(),
                code = reason.code(),
                "Scan rejected"
            );
            return Ok(ScanOutcome::rejected(reason, state));
        }

        let first_check_in = request.scan_type == ScanType::CheckIn
            && !history.iter().any(|s| s.scan_type == ScanType::CheckIn);

        let session_id = self
            .sessions
            .active_for_event(&key.event_id)
            .await?
            .map(|s| s.id);

        let scan = ScanEvent::new(
            key.badge_id.clone(),
            key.event_id.clone(),
            request.scan_type,
            scanned_at,
        )
        .with_location(request.location.clone())
        .with_notes(request.notes.clone())
        .with_operator(operator)
        .with_session(session_id);

        let minutes_before = state.cumulative_minutes;
        self.append(scan.clone()).await?;
        state.apply(&scan);
        let session_minutes = (request.scan_type == ScanType::CheckOut)
            .then(|| state.cumulative_minutes - minutes_before);

        // Attribution is best-effort analytics: an accepted scan stands
        // even if the session counters cannot be updated.
        if session_id.is_some() {
            if let Err(e) = self.sessions.record_scan(&key.event_id, &key.badge_id).await {
                warn!(error = %e, "Failed to attribute scan to session");
            }
        }

        metrics().scans_accepted.inc();
        metrics()
            .scan_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        info!(
            badge_id = %key.badge_id,
            event_id = %key.event_id,
            scan_type = request.scan_type.as_str(),
            status = ?state.current_status,
            cumulative_minutes = state.cumulative_minutes,
            "Scan accepted"
        );

        Ok(ScanOutcome {
            accepted: true,
            reason: None,
            code: None,
            message: accept_message(&attendee, request.scan_type, first_check_in),
            state,
            scan: Some(scan),
            first_check_in,
            session_minutes,
        })
    }

    /// Resolves an attendee with the directory lookup timeout applied.
    pub async fn resolve(&self, token: &BadgeToken, event_id: &str) -> Result<Attendee> {
        metrics().lookups.inc();
        let start = Instant::now();

        let resolved = tokio::time::timeout(
            self.config.lookup_timeout,
            self.directory.resolve(token.badge_id(), event_id),
        )
        .await
        .map_err(|_| {
            metrics().lookup_failures.inc();
            Error::lookup(LookupErrorCode::Unavailable, "directory lookup timed out")
        })?
        .map_err(|e| {
            metrics().lookup_failures.inc();
            e
        })?;

        metrics()
            .lookup_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        match resolved {
            Some(attendee) => Ok(attendee),
            None => {
                metrics().lookup_misses.inc();
                debug!(badge_id = %token.badge_id(), "Badge not found");
                Err(Error::badge_not_found(token.badge_id()))
            }
        }
    }

    /// Current derived state for a pair, replayed from the ledger.
    pub async fn current_state(&self, badge_id: &str, event_id: &str) -> Result<AttendanceState> {
        let key = PairKey::new(badge_id, event_id);
        let history = self.ledger.events_for_pair(&key).await?;
        Ok(AttendanceState::replay(badge_id, event_id, &history))
    }

    async fn append(&self, scan: ScanEvent) -> Result<()> {
        tokio::time::timeout(self.config.append_timeout, self.ledger.append(scan))
            .await
            .map_err(|_| {
                metrics().ledger_append_errors.inc();
                Error::store(StoreErrorCode::Timeout, "ledger append timed out")
            })?
            .map_err(|e| {
                metrics().ledger_append_errors.inc();
                e
            })
    }
}

fn accept_message(attendee: &Attendee, scan_type: ScanType, first_check_in: bool) -> String {
    match scan_type {
        ScanType::CheckIn if first_check_in => {
            format!("Welcome to your first visit, {}!", attendee.display_name)
        }
        ScanType::CheckIn => format!("Welcome back, {}!", attendee.display_name),
        ScanType::CheckOut => {
            format!("Goodbye, {}! Thanks for attending.", attendee.display_name)
        }
        ScanType::Verification => format!("Verified {}.", attendee.display_name),
    }
}
