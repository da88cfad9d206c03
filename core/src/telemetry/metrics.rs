use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters kept by the aircraft registry.
#[derive(Debug)]
pub struct TrackingMetrics {
    inner: Mutex<MetricsSnapshot>,
}

/// Point-in-time copy of the tracking counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub samples: usize,
    pub rejected: usize,
    pub aircraft_created: usize,
    pub estimates: usize,
}

impl TrackingMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_sample(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.samples += 1;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    pub fn record_created(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.aircraft_created += 1;
        }
    }

    pub fn record_estimate(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.estimates += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for TrackingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = TrackingMetrics::new();
        metrics.record_sample();
        metrics.record_sample();
        metrics.record_created();
        metrics.record_rejected();
        metrics.record_estimate();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.samples, 2);
        assert_eq!(snapshot.aircraft_created, 1);
        assert_eq!(snapshot.rejected, 1);
        assert_eq!(snapshot.estimates, 1);
    }
}
