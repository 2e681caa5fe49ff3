//! HTTP client for invoking the sleep agent.

use std::time::{Duration, Instant};

use agent_telemetry::log_event;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use shared_types::{InvocationRequest, INVOCATIONS_PATH, REQUEST_ID_HEADER, SESSION_ID_HEADER};
use thiserror::Error;

use crate::config::{InvokeConfig, TransportConfig};

const COMPONENT: &str = "client";

/// Errors that can occur when invoking the agent.
///
/// The variants only make logs easier to read; the runner treats all of them
/// the same way.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("timed out after {elapsed:?}: {message}")]
    Timeout { elapsed: Duration, message: String },
    #[error("agent returned {status}: {body}")]
    Remote { status: StatusCode, body: String },
    #[error("transport error: {0}")]
    Transport(String),
}

impl InvokeError {
    fn from_reqwest(err: reqwest::Error, elapsed: Duration) -> Self {
        if err.is_timeout() {
            InvokeError::Timeout {
                elapsed,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            InvokeError::Connect(err.to_string())
        } else {
            InvokeError::Transport(err.to_string())
        }
    }

    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, InvokeError::Connect(_) | InvokeError::Timeout { .. })
    }
}

/// A completed call and everything the agent sent back.
#[derive(Debug, Clone)]
pub struct InvocationOutcome {
    pub session_id: String,
    pub request_id: String,
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Wall-clock time from send to the last body byte
    pub elapsed: Duration,
    pub completed_at: DateTime<Utc>,
}

impl InvocationOutcome {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Agent invocation client.
pub struct AgentInvoker {
    client: Client,
    url: String,
    bearer_token: Option<String>,
    max_attempts: u32,
}

impl AgentInvoker {
    /// Create a new client; transport settings are applied to its connection pool.
    pub fn new(config: &InvokeConfig) -> Result<Self, InvokeError> {
        let client = build_client(&config.transport)?;

        Ok(Self {
            client,
            url: invocation_url(config),
            bearer_token: config.bearer_token.clone(),
            max_attempts: config.transport.max_attempts.max(1),
        })
    }

    /// Full URL calls are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and wait for the whole response body.
    ///
    /// Blocks until the agent answers or the read timeout fires.
    pub async fn invoke(
        &self,
        request: &InvocationRequest,
        session_id: &str,
    ) -> Result<InvocationOutcome, InvokeError> {
        let mut attempt = 1;
        loop {
            match self.invoke_once(request, session_id).await {
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    log_event!(
                        warn,
                        COMPONENT,
                        "Attempt failed, retrying",
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn invoke_once(
        &self,
        request: &InvocationRequest,
        session_id: &str,
    ) -> Result<InvocationOutcome, InvokeError> {
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut builder = self
            .client
            .post(&self.url)
            .header(header::ACCEPT, "application/json")
            .header(SESSION_ID_HEADER, session_id)
            .header(REQUEST_ID_HEADER, &request_id)
            .json(request);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| InvokeError::from_reqwest(e, started.elapsed()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| InvokeError::from_reqwest(e, started.elapsed()))?;
        let elapsed = started.elapsed();

        if !status.is_success() {
            return Err(InvokeError::Remote {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(InvocationOutcome {
            session_id: session_id.to_string(),
            request_id,
            status,
            headers,
            body: body.to_vec(),
            elapsed,
            completed_at: Utc::now(),
        })
    }
}

fn build_client(transport: &TransportConfig) -> Result<Client, InvokeError> {
    let budget = transport.budget;
    let mut builder = Client::builder()
        .connect_timeout(budget.connect_timeout)
        .read_timeout(budget.read_timeout)
        .timeout(budget.read_timeout);

    if let Some(keep_alive) = transport.keep_alive {
        builder = builder
            .tcp_keepalive(keep_alive.idle)
            .tcp_keepalive_interval(keep_alive.interval)
            .tcp_keepalive_retries(keep_alive.count);
    }

    builder
        .build()
        .map_err(|e| InvokeError::Transport(e.to_string()))
}

/// URL for one invocation: the runtime data-plane path when a runtime
/// identifier is configured, otherwise the agent's own route.
pub fn invocation_url(config: &InvokeConfig) -> String {
    let base = config.endpoint.trim().trim_end_matches('/');
    match &config.agent_runtime_arn {
        Some(arn) => format!(
            "{}/runtimes/{}{}?qualifier={}",
            base,
            urlencoding::encode(arn.trim()),
            INVOCATIONS_PATH,
            urlencoding::encode(config.qualifier.trim())
        ),
        None => format!("{}{}", base, INVOCATIONS_PATH),
    }
}

/// Session identifier unique per call: `sleep-test-{unix_secs}-{unix_micros}`.
pub fn new_session_id() -> String {
    session_id_at(Utc::now())
}

fn session_id_at(now: DateTime<Utc>) -> String {
    format!("sleep-test-{}-{}", now.timestamp(), now.timestamp_micros())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_direct_url() {
        let config = InvokeConfig {
            endpoint: "http://localhost:8080/".into(),
            ..Default::default()
        };
        assert_eq!(invocation_url(&config), "http://localhost:8080/invocations");
    }

    #[test]
    fn test_runtime_url_encodes_arn() {
        let config = InvokeConfig {
            endpoint: "https://runtime.example.com".into(),
            agent_runtime_arn: Some(
                "arn:aws:bedrock-agentcore:us-west-2:123456789012:runtime/sleep_agent-abc".into(),
            ),
            ..Default::default()
        };
        assert_eq!(
            invocation_url(&config),
            "https://runtime.example.com/runtimes/\
             arn%3Aaws%3Abedrock-agentcore%3Aus-west-2%3A123456789012%3Aruntime%2Fsleep_agent-abc\
             /invocations?qualifier=DEFAULT"
        );
    }

    #[test]
    fn test_session_id_format() {
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        assert_eq!(
            session_id_at(now),
            "sleep-test-1700000000-1700000000123456"
        );
    }

    #[test]
    fn test_session_ids_distinct() {
        let first = new_session_id();
        std::thread::sleep(Duration::from_millis(2));
        let second = new_session_id();
        assert_ne!(first, second);
        assert!(first.starts_with("sleep-test-"));
    }

    #[test]
    fn test_retry_classification() {
        assert!(InvokeError::Connect("refused".into()).is_retryable());
        assert!(!InvokeError::Remote {
            status: StatusCode::BAD_REQUEST,
            body: String::new(),
        }
        .is_retryable());
        assert!(!InvokeError::Transport("reset".into()).is_retryable());
    }

    #[test]
    fn test_client_builds_with_keep_alive() {
        let mut config = InvokeConfig::default();
        config.transport.keep_alive = Some(Default::default());
        let invoker = AgentInvoker::new(&config).unwrap();
        assert_eq!(invoker.url(), "http://127.0.0.1:8080/invocations");
    }
}
