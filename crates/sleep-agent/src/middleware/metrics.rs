//! Runtime counters for the agent.
//!
//! Drives the health probe's busy state: the agent reports `HealthyBusy`
//! while any invocation is waiting.

use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

/// Agent runtime metrics
#[derive(Debug)]
pub struct AgentMetrics {
    pub invocations_started: AtomicU64,
    pub invocations_completed: AtomicU64,
    pub invocations_rejected: AtomicU64,
    pub in_flight: AtomicU64,
    /// Unix seconds of the last idle/busy transition
    pub last_status_change: AtomicI64,
}

impl Default for AgentMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentMetrics {
    pub fn new() -> Self {
        Self {
            invocations_started: AtomicU64::new(0),
            invocations_completed: AtomicU64::new(0),
            invocations_rejected: AtomicU64::new(0),
            in_flight: AtomicU64::new(0),
            last_status_change: AtomicI64::new(unix_now()),
        }
    }

    /// Record an invocation entering its wait
    pub fn record_started(&self) {
        self.invocations_started.fetch_add(1, Ordering::Relaxed);
        if self.in_flight.fetch_add(1, Ordering::AcqRel) == 0 {
            self.touch();
        }
    }

    /// Record an invocation leaving its wait
    pub fn record_completed(&self) {
        self.invocations_completed.fetch_add(1, Ordering::Relaxed);
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.touch();
        }
    }

    /// Mark an invocation as started; completion is recorded when the guard drops,
    /// including when the wait task panics
    pub fn track(metrics: &Arc<Self>) -> InFlightGuard {
        metrics.record_started();
        InFlightGuard {
            metrics: Arc::clone(metrics),
        }
    }

    /// Record a payload that never reached the handler
    pub fn record_rejected(&self) {
        self.invocations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Whether any invocation is currently waiting
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            invocations_started: self.invocations_started.load(Ordering::Relaxed),
            invocations_completed: self.invocations_completed.load(Ordering::Relaxed),
            invocations_rejected: self.invocations_rejected.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Acquire),
            last_status_change: self.last_status_change.load(Ordering::Relaxed),
        }
    }

    fn touch(&self) {
        self.last_status_change.store(unix_now(), Ordering::Relaxed);
    }
}

/// Keeps an invocation counted as in flight until dropped
#[derive(Debug)]
pub struct InFlightGuard {
    metrics: Arc<AgentMetrics>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.metrics.record_completed();
    }
}

/// Point-in-time copy of [`AgentMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub invocations_started: u64,
    pub invocations_completed: u64,
    pub invocations_rejected: u64,
    pub in_flight: u64,
    pub last_status_change: i64,
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_tracking() {
        let metrics = AgentMetrics::new();
        assert!(!metrics.is_busy());

        metrics.record_started();
        metrics.record_started();
        assert!(metrics.is_busy());

        metrics.record_completed();
        assert!(metrics.is_busy());

        metrics.record_completed();
        assert!(!metrics.is_busy());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.invocations_started, 2);
        assert_eq!(snapshot.invocations_completed, 2);
        assert_eq!(snapshot.in_flight, 0);
    }

    #[test]
    fn test_guard_records_completion_on_drop() {
        let metrics = Arc::new(AgentMetrics::new());
        let guard = AgentMetrics::track(&metrics);
        assert!(metrics.is_busy());

        drop(guard);
        assert!(!metrics.is_busy());
        assert_eq!(metrics.snapshot().invocations_completed, 1);
    }

    #[test]
    fn test_rejections_do_not_mark_busy() {
        let metrics = AgentMetrics::new();
        metrics.record_rejected();
        assert!(!metrics.is_busy());
        assert_eq!(metrics.snapshot().invocations_rejected, 1);
    }
}
