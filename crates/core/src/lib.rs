//! Core types and reconciliation rules for the attendance engine.

pub mod badge;
pub mod error;
pub mod limits;
pub mod policy;
pub mod scan;
pub mod session;
pub mod state;

pub use badge::*;
pub use error::{Error, LookupErrorCode, Result, SessionErrorCode, StoreErrorCode};
pub use policy::*;
pub use scan::*;
pub use session::*;
pub use state::*;
