//! Unified error types for the attendance engine.
//!
//! Error codes:
//! - LOOKUP_001-002: Directory lookup errors
//! - SESSION_001-002: Scan session errors
//! - STORE_001-003: Ledger/store errors
//!
//! Business-rule rejections (duplicate check-in, unregistered attendee,
//! ...) are not errors; see [`crate::policy::RejectReason`]. Only lookup
//! misses and infrastructure faults surface here.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Directory lookup error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupErrorCode {
    /// LOOKUP_001: Badge token does not resolve to any attendee
    NotFound,
    /// LOOKUP_002: Directory service unreachable or timed out
    Unavailable,
}

impl LookupErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "LOOKUP_001",
            Self::Unavailable => "LOOKUP_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Unavailable => 502,
        }
    }
}

/// Scan session error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionErrorCode {
    /// SESSION_001: Another session is already active for this event
    AlreadyActive,
    /// SESSION_002: Session id does not exist
    NotFound,
}

impl SessionErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyActive => "SESSION_001",
            Self::NotFound => "SESSION_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::AlreadyActive => 409,
            Self::NotFound => 404,
        }
    }
}

/// Ledger/store error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// STORE_001: Failed to append a scan event
    AppendFailed,
    /// STORE_002: Failed to read from the ledger or session store
    ReadFailed,
    /// STORE_003: Store call timed out
    Timeout,
}

impl StoreErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AppendFailed => "STORE_001",
            Self::ReadFailed => "STORE_002",
            Self::Timeout => "STORE_003",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::AppendFailed => 500,
            Self::ReadFailed => 500,
            Self::Timeout => 504,
        }
    }
}

/// Unified error type for the attendance engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Directory lookup error with code.
    #[error("[{code}] {message}")]
    Lookup {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Scan session error with code.
    #[error("[{code}] {message}")]
    Session {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Ledger/store error with code.
    #[error("[{code}] {message}")]
    Store {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    #[error("invalid badge token: {0}")]
    InvalidToken(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a directory lookup error.
    pub fn lookup(code: LookupErrorCode, msg: impl Into<String>) -> Self {
        Self::Lookup {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a scan session error.
    pub fn session(code: SessionErrorCode, msg: impl Into<String>) -> Self {
        Self::Session {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a ledger/store error.
    pub fn store(code: StoreErrorCode, msg: impl Into<String>) -> Self {
        Self::Store {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Shorthand for an unresolvable badge token.
    pub fn badge_not_found(token: impl Into<String>) -> Self {
        Self::lookup(
            LookupErrorCode::NotFound,
            format!("no attendee matches badge token '{}'", token.into()),
        )
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Lookup { http_status, .. } => *http_status,
            Self::Session { http_status, .. } => *http_status,
            Self::Store { http_status, .. } => *http_status,
            Self::InvalidToken(_) => 400,
            Self::Validation(_) => 400,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Lookup { code, .. } => Some(code),
            Self::Session { code, .. } => Some(code),
            Self::Store { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether retrying the failed operation makes sense.
    ///
    /// Only store faults are retry-worthy, and a retry must re-validate
    /// against current state rather than re-append a stale event.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store { .. })
    }
}
