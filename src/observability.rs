//! Observability stubs (metrics, tracing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    stage_dispatches: AtomicU64,
    sources_resolved: AtomicU64,
    resolve_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_dispatched(&self) {
        self.stage_dispatches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "stage_dispatches", "Metric incremented");
    }

    pub fn source_resolved(&self) {
        self.sources_resolved.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "sources_resolved", "Metric incremented");
    }

    pub fn resolve_failed(&self) {
        self.resolve_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "resolve_failures", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            stage_dispatches: self.stage_dispatches.load(Ordering::Relaxed),
            sources_resolved: self.sources_resolved.load(Ordering::Relaxed),
            resolve_failures: self.resolve_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub stage_dispatches: u64,
    pub sources_resolved: u64,
    pub resolve_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = Metrics::new();
        metrics.stage_dispatched();
        metrics.stage_dispatched();
        metrics.source_resolved();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.stage_dispatches, 2);
        assert_eq!(snapshot.sources_resolved, 1);
        assert_eq!(snapshot.resolve_failures, 0);
    }
}
