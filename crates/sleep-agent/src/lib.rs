//! Sleep Agent - a deliberately long-running agent behind an HTTP runtime.
//!
//! Each invocation waits for the requested number of seconds and returns a
//! completion record. It exists to exercise the timeout behaviour of whatever
//! sits between a caller and the agent.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      SLEEP AGENT                           │
//! ├────────────────────────────────────────────────────────────┤
//! │   POST /invocations            GET /ping                   │
//! │          │                         │                       │
//! │  ┌───────┴─────────────────────────┴──────┐                │
//! │  │           Middleware Stack             │                │
//! │  │        Tracing → BodyLimit             │                │
//! │  └───────┬─────────────────────────┬──────┘                │
//! │          │                         │                       │
//! │  ┌───────┴────────┐        ┌───────┴────────┐              │
//! │  │  SleepHandler  │──────▶│  AgentMetrics   │              │
//! │  │ (spawned task) │ in-    │ Healthy / Busy  │              │
//! │  └───────┬────────┘ flight └────────────────┘              │
//! │          │                                                 │
//! │        Clock (port)                                        │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use sleep_agent::{AgentConfig, AgentService};
//!
//! let service = AgentService::new(AgentConfig::from_env()?)?;
//! service.run(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use domain::config::AgentConfig;
pub use domain::error::{AgentError, AgentResult};
pub use domain::handler::SleepHandler;
pub use middleware::{AgentMetrics, MetricsSnapshot};
pub use ports::{Clock, SystemClock, TokioClock};
pub use service::{AgentService, PingResponse, PingStatus};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Agent version string reported at startup
pub fn agent_version() -> String {
    format!("SleepAgent/v{}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_agent_version() {
        let version = agent_version();
        assert!(version.starts_with("SleepAgent/"));
        assert!(version.contains(VERSION));
    }
}
