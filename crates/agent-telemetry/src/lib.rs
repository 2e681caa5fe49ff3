//! # Agent Telemetry
//!
//! Structured logging for the sleep agent and the invocation tool.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = TelemetryConfig::from_env("sleep-agent");
//!     let _guard = init_telemetry(config)?;
//!     // Log lines are now being written
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AGENT_SERVICE_NAME` | binary name | Service name on log lines |
//! | `AGENT_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `AGENT_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `AGENT_JSON_LOGS` | `false` (`true` in containers) | JSON formatted logs |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install log subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize structured logging.
///
/// Returns a guard to hold for the lifetime of the application; dropping it
/// logs the shutdown line.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(&config)?;

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Structured logging configured"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Create a span carrying the component name.
#[macro_export]
macro_rules! component_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_carries_service_name() {
        let config = TelemetryConfig {
            service_name: "agent-invoke".to_string(),
            console_output: false,
            ..Default::default()
        };

        let guard = init_telemetry(config).unwrap();
        assert_eq!(guard.service_name(), "agent-invoke");
    }
}
