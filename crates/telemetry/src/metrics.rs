//! Scan pipeline metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Latency histogram tuned for interactive scanning.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 3s, 10s
    buckets: [AtomicU64; 10],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 10] = [5, 10, 25, 50, 100, 250, 500, 1000, 3000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len() - 1);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum.load(Ordering::Relaxed) as f64 / count as f64
        }
    }

    /// Returns (upper_bound_ms, count) per bucket.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the attendance engine.
#[derive(Debug, Default)]
pub struct Metrics {
    // Scan pipeline
    pub scans_received: Counter,
    pub scans_accepted: Counter,
    pub scans_rejected: Counter,
    pub ledger_append_errors: Counter,

    // Directory lookups
    pub lookups: Counter,
    pub lookup_misses: Counter,
    pub lookup_failures: Counter,

    // Tracking sessions
    pub sessions_started: Counter,
    pub sessions_ended: Counter,

    // Latency
    pub scan_latency_ms: Histogram,
    pub lookup_latency_ms: Histogram,

    // Gauges
    pub active_sessions: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            scans_received: self.scans_received.get(),
            scans_accepted: self.scans_accepted.get(),
            scans_rejected: self.scans_rejected.get(),
            ledger_append_errors: self.ledger_append_errors.get(),
            lookups: self.lookups.get(),
            lookup_misses: self.lookup_misses.get(),
            lookup_failures: self.lookup_failures.get(),
            sessions_started: self.sessions_started.get(),
            sessions_ended: self.sessions_ended.get(),
            scan_latency_mean_ms: self.scan_latency_ms.mean(),
            lookup_latency_mean_ms: self.lookup_latency_ms.mean(),
            active_sessions: self.active_sessions.get(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub scans_received: u64,
    pub scans_accepted: u64,
    pub scans_rejected: u64,
    pub ledger_append_errors: u64,
    pub lookups: u64,
    pub lookup_misses: u64,
    pub lookup_failures: u64,
    pub sessions_started: u64,
    pub sessions_ended: u64,
    pub scan_latency_mean_ms: f64,
    pub lookup_latency_mean_ms: f64,
    pub active_sessions: u64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
