//! # Invocation Records
//!
//! The request an invocation carries, the context the hosting runtime attaches
//! to it, and the completion record the agent returns.
//!
//! ## Lifecycle
//!
//! ```text
//! InvocationRequest + InvocationContext ──wait──→ InvocationResult
//! ```
//!
//! Both records are transient: they exist for the duration of one request.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ContractError;

/// Wait applied when a request omits `duration_seconds` (or sends null).
pub const DEFAULT_DURATION_SECS: u64 = 280;

/// Session identifier reported when the call context carries none.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Request identifier reported when the call context carries none.
pub const DEFAULT_REQUEST_ID: &str = "unknown";

/// Marker the invocation tool puts in `test_type`.
pub const SLEEP_TEST_TYPE: &str = "sleep_test";

/// Payload of one invocation.
///
/// `test_type` and `message` are opaque to the agent. Unknown keys are kept in
/// `extra` so the payload can be logged exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Seconds to wait. `None` means [`DEFAULT_DURATION_SECS`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl InvocationRequest {
    /// Payload the invocation tool sends for a sleep test case.
    pub fn sleep_test(duration_seconds: u64) -> Self {
        Self {
            duration_seconds: Some(duration_seconds),
            test_type: Some(SLEEP_TEST_TYPE.to_string()),
            message: Some(format!("Testing {}s sleep duration", duration_seconds)),
            extra: serde_json::Map::new(),
        }
    }

    /// Decode a request body.
    ///
    /// An empty (or whitespace-only) body is an empty payload. Anything else
    /// must be a JSON object whose known fields have the right types.
    pub fn from_body(body: &[u8]) -> Result<Self, ContractError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| ContractError::Malformed(e.to_string()))?;

        if !value.is_object() {
            return Err(ContractError::NotAnObject);
        }

        serde_json::from_value(value).map_err(|e| ContractError::InvalidField(e.to_string()))
    }
}

/// Identifiers the hosting runtime attaches to a call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    pub session_id: Option<String>,
    pub request_id: Option<String>,
}

impl InvocationContext {
    pub fn new(session_id: Option<String>, request_id: Option<String>) -> Self {
        Self {
            session_id: session_id.filter(|s| !s.is_empty()),
            request_id: request_id.filter(|s| !s.is_empty()),
        }
    }

    /// Session identifier, or [`DEFAULT_SESSION_ID`].
    pub fn session_id(&self) -> &str {
        self.session_id.as_deref().unwrap_or(DEFAULT_SESSION_ID)
    }

    /// Request identifier, or [`DEFAULT_REQUEST_ID`].
    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or(DEFAULT_REQUEST_ID)
    }
}

/// Outcome of an invocation. The agent has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    Completed,
}

/// Completion record returned by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub status: InvocationStatus,
    pub duration_seconds: u64,
    pub session_id: String,
    pub request_id: String,
    /// Taken after the wait finished. RFC 3339, UTC, microsecond precision.
    #[serde(with = "rfc3339_micros")]
    pub completion_time: DateTime<Utc>,
    pub message: String,
}

impl InvocationResult {
    /// Build the record for a finished wait.
    pub fn completed(
        duration_seconds: u64,
        context: &InvocationContext,
        completion_time: DateTime<Utc>,
    ) -> Self {
        Self {
            status: InvocationStatus::Completed,
            duration_seconds,
            session_id: context.session_id().to_string(),
            request_id: context.request_id().to_string(),
            completion_time: completion_time.trunc_subsecs(6),
            message: format!(
                "{}s wait test completed successfully",
                duration_seconds
            ),
        }
    }
}

/// `DateTime<Utc>` as RFC 3339 with exactly six fractional digits.
mod rfc3339_micros {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
