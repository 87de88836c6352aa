//! Attendee directory lookup.
//!
//! The directory is owned by the external registration system. This
//! module exposes the lookup contract, an HTTP client for the real
//! service, and a seedable in-memory directory for development and
//! tests.

use async_trait::async_trait;
use moka::future::Cache;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use attendance_core::{Attendee, Error, LookupErrorCode, Result};

/// Cache TTL for directory responses (30 seconds).
///
/// Registration changes mid-event are rare; a short TTL keeps repeated
/// scans of the same badge from hammering the directory service.
const LOOKUP_CACHE_TTL: Duration = Duration::from_secs(30);

/// Maximum cached lookups.
const LOOKUP_CACHE_MAX_CAPACITY: u64 = 10_000;

/// Resolves badge ids to attendee records, scoped to an event.
#[async_trait]
pub trait AttendeeDirectory: Send + Sync {
    /// Resolves a badge id against an event. `Ok(None)` is a miss.
    ///
    /// The returned record's `is_registered` flag is computed against
    /// the given event, not badge existence.
    async fn resolve(&self, badge_id: &str, event_id: &str) -> Result<Option<Attendee>>;

    /// All attendees registered for an event (the stats roster).
    async fn registered_for_event(&self, event_id: &str) -> Result<Vec<Attendee>>;

    /// Whether the directory backend is reachable.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// Wire format of the directory service lookup response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    found: bool,
    attendee: Option<Attendee>,
}

/// HTTP client for the registration directory service.
///
/// Calls `GET {base}/attendees/{badgeId}?eventId=...` and caches
/// responses briefly to absorb repeated scans.
#[derive(Clone)]
pub struct HttpDirectory {
    base_url: String,
    http_client: reqwest::Client,
    /// Lookup cache keyed by "badge_id|event_id"
    cache: Cache<String, Option<Attendee>>,
}

impl HttpDirectory {
    /// Creates a new directory client with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| Error::internal(format!("failed to create HTTP client: {e}")))?,
            cache: Cache::builder()
                .max_capacity(LOOKUP_CACHE_MAX_CAPACITY)
                .time_to_live(LOOKUP_CACHE_TTL)
                .build(),
        })
    }

    /// Drop any cached lookup for a badge at an event.
    pub async fn invalidate(&self, badge_id: &str, event_id: &str) {
        self.cache.invalidate(&cache_key(badge_id, event_id)).await;
    }

    async fn remote_resolve(&self, badge_id: &str, event_id: &str) -> Result<Option<Attendee>> {
        let url = format!("{}/attendees/{}", self.base_url, badge_id);

        debug!(url = %url, event_id = %event_id, "Calling directory service");

        let response = self
            .http_client
            .get(&url)
            .query(&[("eventId", event_id)])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Directory request failed");
                Error::lookup(
                    LookupErrorCode::Unavailable,
                    format!("directory unavailable: {e}"),
                )
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            warn!(status = %status, "Directory service returned error");
            return Err(Error::lookup(
                LookupErrorCode::Unavailable,
                format!("directory returned {status}"),
            ));
        }

        let lookup: LookupResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse directory response");
            Error::lookup(
                LookupErrorCode::Unavailable,
                format!("invalid directory response: {e}"),
            )
        })?;

        Ok(if lookup.found { lookup.attendee } else { None })
    }
}

#[async_trait]
impl AttendeeDirectory for HttpDirectory {
    async fn resolve(&self, badge_id: &str, event_id: &str) -> Result<Option<Attendee>> {
        let key = cache_key(badge_id, event_id);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(badge_id = %badge_id, "Directory cache hit");
            return Ok(cached);
        }

        let resolved = self.remote_resolve(badge_id, event_id).await?;
        self.cache.insert(key, resolved.clone()).await;
        Ok(resolved)
    }

    async fn registered_for_event(&self, event_id: &str) -> Result<Vec<Attendee>> {
        let url = format!("{}/events/{}/attendees", self.base_url, event_id);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "Roster request failed");
            Error::lookup(
                LookupErrorCode::Unavailable,
                format!("directory unavailable: {e}"),
            )
        })?;

        if !response.status().is_success() {
            return Err(Error::lookup(
                LookupErrorCode::Unavailable,
                format!("directory returned {}", response.status()),
            ));
        }

        response.json().await.map_err(|e| {
            Error::lookup(
                LookupErrorCode::Unavailable,
                format!("invalid roster response: {e}"),
            )
        })
    }
}

fn cache_key(badge_id: &str, event_id: &str) -> String {
    format!("{badge_id}|{event_id}")
}

/// Seedable in-memory directory for development and tests.
///
/// Registration is tracked per (badge, event) pair; an attendee seeded
/// for one event resolves as unregistered for any other.
#[derive(Default)]
pub struct MemoryDirectory {
    /// Attendee records by badge id
    attendees: RwLock<HashMap<String, Attendee>>,
    /// Registered badge ids per event, in insertion order
    rosters: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an attendee, registered for the given event when
    /// `attendee.is_registered` is set.
    pub fn seed(&self, event_id: &str, attendee: Attendee) {
        if attendee.is_registered {
            let mut rosters = self.rosters.write();
            let roster = rosters.entry(event_id.to_string()).or_default();
            if !roster.contains(&attendee.badge_id) {
                roster.push(attendee.badge_id.clone());
            }
        }
        self.attendees
            .write()
            .insert(attendee.badge_id.clone(), attendee);
    }

    /// Shared handle, for wiring into the engine.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl AttendeeDirectory for MemoryDirectory {
    async fn resolve(&self, badge_id: &str, event_id: &str) -> Result<Option<Attendee>> {
        let attendee = match self.attendees.read().get(badge_id) {
            Some(a) => a.clone(),
            None => return Ok(None),
        };

        let registered = self
            .rosters
            .read()
            .get(event_id)
            .is_some_and(|roster| roster.iter().any(|b| b == badge_id));

        Ok(Some(attendee.with_registered(registered)))
    }

    async fn registered_for_event(&self, event_id: &str) -> Result<Vec<Attendee>> {
        let rosters = self.rosters.read();
        let attendees = self.attendees.read();

        let roster = rosters.get(event_id).cloned().unwrap_or_default();
        Ok(roster
            .iter()
            .filter_map(|badge_id| attendees.get(badge_id))
            .map(|a| a.clone().with_registered(true))
            .collect())
    }
}
