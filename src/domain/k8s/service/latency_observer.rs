use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::warn;

/// Receives the latency of cluster fetches. Purely observational.
pub trait LatencyObserver: Send + Sync {
    fn observe(&self, operation: &str, elapsed: Duration);
}

/// Discards every observation.
pub struct NoopLatencyObserver;

impl LatencyObserver for NoopLatencyObserver {
    fn observe(&self, _operation: &str, _elapsed: Duration) {}
}

/// Remembers the last fetch slower than `threshold` and reports the service
/// as degraded for `window` afterwards.
pub struct SlowRequestTracker {
    threshold: Duration,
    window: Duration,
    last_slow: Mutex<Option<Instant>>,
}

impl SlowRequestTracker {
    pub fn new(threshold: Duration, window: Duration) -> Self {
        Self {
            threshold,
            window,
            last_slow: Mutex::new(None),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.is_degraded_at(Instant::now())
    }

    fn is_degraded_at(&self, now: Instant) -> bool {
        let last = *self.last_slow.lock().unwrap_or_else(|e| e.into_inner());
        last.is_some_and(|at| now.saturating_duration_since(at) < self.window)
    }
}

impl LatencyObserver for SlowRequestTracker {
    fn observe(&self, operation: &str, elapsed: Duration) {
        if elapsed <= self.threshold {
            return;
        }

        *self.last_slow.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
        warn!(
            operation,
            api_time_ms = elapsed.as_millis() as u64,
            threshold_ms = self.threshold.as_millis() as u64,
            "Very slow API request detected"
        );
    }
}
