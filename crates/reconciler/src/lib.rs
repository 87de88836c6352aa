//! The attendance reconciliation engine.
//!
//! Given a stream of badge scans, maintains consistent check-in /
//! check-out state and session-time accounting per (attendee, event)
//! pair. Transport-agnostic: the surrounding application decides how
//! requests arrive.

pub mod aggregator;
pub mod locks;
pub mod processor;
pub mod sessions;

pub use aggregator::{Aggregator, AttendeeStats, EventStats};
pub use locks::PairLocks;
pub use processor::{ProcessorConfig, ScanOutcome, ScanProcessor};
pub use sessions::SessionController;
