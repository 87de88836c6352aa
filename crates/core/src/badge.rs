//! Attendee records and badge token parsing.
//!
//! Badge QR payloads arrive in several shapes: a bare id with a known
//! prefix (`CBA-...`, `AIS2025-...`), a query string or full URL with an
//! embedded `badgeId` parameter, or an unprefixed opaque id. The parser
//! normalizes all of them to a badge id before the directory lookup.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::error::{Error, Result};
use crate::limits::MAX_BADGE_TOKEN_LEN;

/// Badge id prefixes issued by the platform. Tokens starting with one of
/// these are already bare ids and pass through unchanged.
pub const KNOWN_BADGE_PREFIXES: &[&str] = &["CBA-", "AIS2025-"];

static BADGE_ID_PARAM: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"badgeId=([^&\s]+)").expect("valid regex"));

/// An attendee record resolved from a badge token.
///
/// Owned by the external registration workflow; read-only here.
/// `is_registered` is scoped to the event being scanned — an attendee
/// can hold a badge without being registered for that event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// Badge id, unique within the event namespace
    #[validate(length(min = 1, max = 64))]
    pub badge_id: String,
    /// Display name
    #[validate(length(max = 200))]
    pub display_name: String,
    /// Contact email
    #[validate(length(max = 254))]
    pub email: String,
    /// Participant type label (attendee, exhibitor, speaker, volunteer, ...)
    #[validate(length(max = 64))]
    pub participant_type: String,
    /// Whether the attendee is registered for the event being scanned
    pub is_registered: bool,
    /// Registration record id, when registered
    pub registration_id: Option<String>,
    /// Whether the badge is active; deactivated badges are rejected
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Attendee {
    /// Creates a registered, active attendee.
    pub fn new(
        badge_id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            badge_id: badge_id.into(),
            display_name: display_name.into(),
            email: email.into(),
            participant_type: "attendee".into(),
            is_registered: true,
            registration_id: None,
            active: true,
        }
    }

    pub fn with_registered(mut self, registered: bool) -> Self {
        self.is_registered = registered;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// A parsed badge token.
///
/// Tagged by source format so new QR shapes can be added without
/// touching validation logic downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum BadgeToken {
    /// Bare badge id, passed through unchanged.
    Direct { badge_id: String },
    /// Badge id extracted from a `badgeId=` parameter in a query string
    /// or URL payload.
    Embedded { badge_id: String, raw: String },
}

impl BadgeToken {
    /// Parses a raw QR payload or manually entered token.
    ///
    /// Rules, in order:
    /// 1. tokens with a known prefix are bare ids;
    /// 2. payloads containing `badgeId=` yield the embedded parameter
    ///    (URL-decoded when the payload is a well-formed URL or query
    ///    string, regex fallback otherwise);
    /// 3. anything else is treated as a bare id.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::invalid_token("empty badge token"));
        }
        if raw.len() > MAX_BADGE_TOKEN_LEN {
            return Err(Error::invalid_token(format!(
                "token length {} exceeds {} limit",
                raw.len(),
                MAX_BADGE_TOKEN_LEN
            )));
        }

        if KNOWN_BADGE_PREFIXES.iter().any(|p| raw.starts_with(p)) {
            return Ok(Self::Direct {
                badge_id: raw.to_string(),
            });
        }

        if raw.contains("badgeId=") {
            if let Some(badge_id) = extract_embedded_id(raw) {
                return Ok(Self::Embedded {
                    badge_id,
                    raw: raw.to_string(),
                });
            }
            return Err(Error::invalid_token("payload has an empty badgeId parameter"));
        }

        Ok(Self::Direct {
            badge_id: raw.to_string(),
        })
    }

    /// The resolved badge id.
    pub fn badge_id(&self) -> &str {
        match self {
            Self::Direct { badge_id } => badge_id,
            Self::Embedded { badge_id, .. } => badge_id,
        }
    }
}

/// Pulls the `badgeId` parameter out of a URL or query-string payload.
fn extract_embedded_id(raw: &str) -> Option<String> {
    // Full URL: decode properly via the query pairs.
    if let Ok(url) = url::Url::parse(raw) {
        if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "badgeId") {
            if !v.is_empty() {
                return Some(v.into_owned());
            }
        }
    }

    // Bare query string (`badgeId=X&loc=Y` or `?badgeId=X`).
    let query = raw.trim_start_matches('?');
    if let Some((_, v)) = url::form_urlencoded::parse(query.as_bytes()).find(|(k, _)| k == "badgeId")
    {
        if !v.is_empty() && !v.contains('=') {
            return Some(v.into_owned());
        }
    }

    // Loose fallback for payloads that are neither (e.g. badge id glued
    // into free text by a scanner app).
    BADGE_ID_PARAM
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}
