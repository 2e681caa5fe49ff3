//! Agent runtime configuration with validation.

use shared_types::{TimeoutBudget, DEFAULT_AGENT_PORT, DEFAULT_DURATION_SECS};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main agent configuration
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Wait behaviour
    pub wait: WaitConfig,
    /// Request limits
    pub limits: LimitsConfig,
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SLEEP_AGENT_HOST`: Bind address (default: 0.0.0.0)
    /// - `SLEEP_AGENT_PORT`: Port (default: 8080)
    /// - `SLEEP_AGENT_DEFAULT_DURATION_SECS`: Wait when a payload names none (default: 280)
    /// - `SLEEP_AGENT_READ_TIMEOUT_SECS`: Caller read timeout the agent plans against (default: 900)
    /// - `SLEEP_AGENT_MAX_REQUEST_BYTES`: Max request body size (default: 1MB)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = env_var("SLEEP_AGENT_HOST") {
            config.http.host = host
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SLEEP_AGENT_HOST", host))?;
        }
        if let Some(port) = env_var("SLEEP_AGENT_PORT") {
            config.http.port = parse_number("SLEEP_AGENT_PORT", port)?;
        }
        if let Some(secs) = env_var("SLEEP_AGENT_DEFAULT_DURATION_SECS") {
            config.wait.default_duration_secs =
                parse_number("SLEEP_AGENT_DEFAULT_DURATION_SECS", secs)?;
        }
        if let Some(secs) = env_var("SLEEP_AGENT_READ_TIMEOUT_SECS") {
            config.wait.read_timeout =
                Duration::from_secs(parse_number("SLEEP_AGENT_READ_TIMEOUT_SECS", secs)?);
        }
        if let Some(bytes) = env_var("SLEEP_AGENT_MAX_REQUEST_BYTES") {
            config.limits.max_request_size = parse_number("SLEEP_AGENT_MAX_REQUEST_BYTES", bytes)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        if self.wait.read_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "read_timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }

    /// Timeout budget callers are expected to wait with
    pub fn budget(&self) -> TimeoutBudget {
        TimeoutBudget {
            read_timeout: self.wait.read_timeout,
            ..TimeoutBudget::default()
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: DEFAULT_AGENT_PORT,
        }
    }
}

/// Wait configuration
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Seconds to wait when the payload carries no `duration_seconds`
    pub default_duration_secs: u64,
    /// Read timeout of the caller; longer waits are logged, never refused
    pub read_timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: DEFAULT_DURATION_SECS,
            read_timeout: TimeoutBudget::default().read_timeout,
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 1MB)
    pub max_request_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 1024 * 1024, // 1MB
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable that does not parse
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.wait.default_duration_secs, 280);
        assert_eq!(config.budget().read_timeout, Duration::from_secs(900));
        assert_eq!(config.budget().connect_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_config_address() {
        let config = AgentConfig::default();
        assert_eq!(config.http_addr().port(), 8080);
        assert!(config.http_addr().ip().is_unspecified());
    }

    #[test]
    fn test_zero_request_size_rejected() {
        let mut config = AgentConfig::default();
        config.limits.max_request_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLimit(_))
        ));
    }

    #[test]
    fn test_zero_read_timeout_rejected() {
        let mut config = AgentConfig::default();
        config.wait.read_timeout = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn test_parse_number_reports_variable() {
        let err = parse_number::<u16>("SLEEP_AGENT_PORT", "eighty".to_string()).unwrap_err();
        assert!(err.to_string().contains("SLEEP_AGENT_PORT"));
    }

    #[test]
    fn test_parse_number_rejects_overflow() {
        let secs = "184467440737095516160".to_string();
        assert!(matches!(
            parse_number::<u64>("SLEEP_AGENT_READ_TIMEOUT_SECS", secs),
            Err(ConfigError::InvalidValue("SLEEP_AGENT_READ_TIMEOUT_SECS", _))
        ));
        assert_eq!(
            parse_number::<u64>("SLEEP_AGENT_READ_TIMEOUT_SECS", " 900 ".to_string()).unwrap(),
            900
        );
    }
}
