//! Request counters reported by `/health`.
//!
//! Lock-free counters plus per-jurisdiction and per-business-type usage.
//! The server reports `degraded` when the average response time or the
//! error rate crosses its threshold.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;

/// Average response time above which the server reports `degraded`.
pub const MAX_AVG_RESPONSE_MS: f64 = 5000.0;

/// Error rate above which the server reports `degraded`.
pub const MAX_ERROR_RATE: f64 = 0.05;

pub struct ServiceMetrics {
    started: Instant,
    requests: AtomicU64,
    errors: AtomicU64,
    total_response_ms: AtomicU64,
    by_jurisdiction: DashMap<String, AtomicU64>,
    by_business_type: DashMap<String, AtomicU64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub requests: u64,
    pub errors: u64,
    pub error_rate: f64,
    pub avg_response_ms: f64,
    pub by_jurisdiction: BTreeMap<String, u64>,
    pub by_business_type: BTreeMap<String, u64>,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            requests: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            total_response_ms: AtomicU64::new(0),
            by_jurisdiction: DashMap::new(),
            by_business_type: DashMap::new(),
        }
    }

    pub fn record_request(&self, elapsed: Duration, success: bool) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        self.total_response_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    /// Count one answered request against a jurisdiction and, when known, a
    /// business type.
    pub fn record_usage(&self, jurisdiction: &str, business_type: Option<&str>) {
        bump(&self.by_jurisdiction, jurisdiction);
        if let Some(business_type) = business_type {
            bump(&self.by_business_type, business_type);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests.load(Ordering::Relaxed);
        let errors = self.errors.load(Ordering::Relaxed);
        let total_ms = self.total_response_ms.load(Ordering::Relaxed);

        let (error_rate, avg_response_ms) = if requests == 0 {
            (0.0, 0.0)
        } else {
            (errors as f64 / requests as f64, total_ms as f64 / requests as f64)
        };
        let healthy = error_rate <= MAX_ERROR_RATE && avg_response_ms <= MAX_AVG_RESPONSE_MS;

        MetricsSnapshot {
            status: if healthy { "ok" } else { "degraded" },
            uptime_secs: self.started.elapsed().as_secs(),
            requests,
            errors,
            error_rate,
            avg_response_ms,
            by_jurisdiction: counts(&self.by_jurisdiction),
            by_business_type: counts(&self.by_business_type),
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn bump(map: &DashMap<String, AtomicU64>, key: &str) {
    if let Some(counter) = map.get(key) {
        counter.fetch_add(1, Ordering::Relaxed);
        return;
    }
    map.entry(key.to_string())
        .or_insert_with(|| AtomicU64::new(0))
        .fetch_add(1, Ordering::Relaxed);
}

fn counts(map: &DashMap<String, AtomicU64>) -> BTreeMap<String, u64> {
    map.iter()
        .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
        .collect()
}
