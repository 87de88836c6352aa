//! Internal telemetry for the attendance engine.
//!
//! Counters and health flags live in-process; there is no external
//! metrics sink. The snapshot type is what dashboards poll.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
