//! Invocation tool configuration with validation.

use shared_types::{TimeoutBudget, DEFAULT_AGENT_PORT, DEFAULT_QUALIFIER};
use std::time::Duration;
use thiserror::Error;

/// Region logged with each case when none is configured
pub const DEFAULT_REGION: &str = "us-west-2";

/// Where and how to reach the agent
#[derive(Debug, Clone)]
pub struct InvokeConfig {
    /// Base URL of the runtime (or of a locally hosted agent)
    pub endpoint: String,
    /// Agent runtime resource identifier. When set, calls go through the
    /// runtime data-plane path instead of straight to `/invocations`.
    pub agent_runtime_arn: Option<String>,
    /// Runtime endpoint qualifier
    pub qualifier: String,
    /// Informational; logged with each case
    pub region: String,
    /// Sent as `Authorization: Bearer ...`
    pub bearer_token: Option<String>,
    /// Transport tuning
    pub transport: TransportConfig,
}

impl Default for InvokeConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("http://127.0.0.1:{}", DEFAULT_AGENT_PORT),
            agent_runtime_arn: None,
            qualifier: DEFAULT_QUALIFIER.to_string(),
            region: DEFAULT_REGION.to_string(),
            bearer_token: None,
            transport: TransportConfig::default(),
        }
    }
}

impl InvokeConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }

        if let Some(arn) = &self.agent_runtime_arn {
            if arn.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "agent_runtime_arn",
                    "cannot be empty".into(),
                ));
            }
            if self.qualifier.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "qualifier",
                    "cannot be empty".into(),
                ));
            }
        }

        self.transport.validate()
    }
}

/// Client transport settings, handed to the client constructor.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Read/connect timeouts
    pub budget: TimeoutBudget,
    /// Total attempts per case; 1 means no retries
    pub max_attempts: u32,
    /// TCP keep-alive; `None` leaves the OS default in place
    pub keep_alive: Option<KeepAliveConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            budget: TimeoutBudget::default(),
            max_attempts: 1,
            keep_alive: None,
        }
    }
}

impl TransportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget.read_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "read_timeout cannot be 0".into(),
            ));
        }
        if self.budget.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "connect_timeout cannot be 0".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "max_attempts",
                "must be at least 1".into(),
            ));
        }
        if let Some(keep_alive) = &self.keep_alive {
            keep_alive.validate()?;
        }
        Ok(())
    }
}

/// TCP keep-alive probing, so idle long waits are not dropped by middleboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAliveConfig {
    /// Idle time before the first probe
    pub idle: Duration,
    /// Time between probes
    pub interval: Duration,
    /// Unanswered probes before the connection is dropped
    pub count: u32,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(60),
            interval: Duration::from_secs(10),
            count: 6,
        }
    }
}

impl KeepAliveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle.is_zero() || self.interval.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "keep-alive idle and interval must be non-zero".into(),
            ));
        }
        if self.count == 0 {
            return Err(ConfigError::InvalidValue(
                "keep_alive_count",
                "must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = InvokeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint, "http://127.0.0.1:8080");
        assert_eq!(config.transport.max_attempts, 1);
        assert_eq!(config.transport.budget.read_timeout, Duration::from_secs(900));
        assert_eq!(config.transport.budget.connect_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let config = InvokeConfig {
            endpoint: "127.0.0.1:8080".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_rejects_blank_arn() {
        let config = InvokeConfig {
            agent_runtime_arn: Some("  ".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let mut config = InvokeConfig::default();
        config.transport.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_keep_alive_validation() {
        assert!(KeepAliveConfig::default().validate().is_ok());

        let keep_alive = KeepAliveConfig {
            count: 0,
            ..Default::default()
        };
        assert!(keep_alive.validate().is_err());

        let keep_alive = KeepAliveConfig {
            interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(keep_alive.validate().is_err());
    }
}
