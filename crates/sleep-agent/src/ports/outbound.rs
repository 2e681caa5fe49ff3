//! Outbound ports for the sleep agent.

use chrono::{DateTime, Utc};

/// Time source for completion timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall time anchored once, then advanced by tokio's monotonic clock.
///
/// Follows `tokio::time::pause`/`advance`, so timestamps stay consistent with
/// `tokio::time::sleep` under a paused test runtime.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    anchor_wall: DateTime<Utc>,
    anchor: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            anchor_wall: Utc::now(),
            anchor: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = tokio::time::Instant::now().duration_since(self.anchor);
        // Elapsed beyond chrono's range saturates at the anchor
        chrono::Duration::from_std(elapsed)
            .ok()
            .and_then(|d| self.anchor_wall.checked_add_signed(d))
            .unwrap_or(self.anchor_wall)
    }
}
