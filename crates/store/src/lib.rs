//! Boundary contracts for the attendance engine.
//!
//! The engine consumes three external collaborators: an attendee
//! directory, an append-only scan ledger, and a scan-session store.
//! Each is a trait here, with an in-memory implementation providing the
//! per-key atomic semantics the reconciliation logic relies on, plus an
//! HTTP client for the directory.

pub mod directory;
pub mod ledger;
pub mod sessions;

pub use directory::{AttendeeDirectory, HttpDirectory, MemoryDirectory};
pub use ledger::{MemoryLedger, ScanLedger};
pub use sessions::{end_session, MemorySessionStore, SessionStore};
