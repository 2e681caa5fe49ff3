//! # Timeout Budget
//!
//! The timeouts the invocation tool waits with, shared with the agent so that
//! both sides agree on how long a synchronous wait may last before the caller
//! gives up on it.

use std::time::Duration;

/// Read timeout of a default client: 15 minutes.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 900;

/// Connect timeout of a default client.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 60;

/// Read/connect timeouts agreed between client and agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutBudget {
    /// Upper bound on the whole call once connected.
    pub read_timeout: Duration,
    /// Upper bound on establishing the connection.
    pub connect_timeout: Duration,
}

impl Default for TimeoutBudget {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl TimeoutBudget {
    pub fn new(read_timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            read_timeout,
            connect_timeout,
        }
    }

    /// Whether a caller on this budget can observe a wait of `wait` to the end.
    pub fn admits(&self, wait: Duration) -> bool {
        wait < self.read_timeout
    }
}
