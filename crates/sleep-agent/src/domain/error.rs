//! Agent runtime error types and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared_types::ContractError;

/// Stable error codes carried in error bodies
pub mod codes {
    pub const INVALID_PAYLOAD: &str = "invalid_payload";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Errors surfaced by the agent runtime
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Payload does not decode as an `InvocationRequest`
    #[error(transparent)]
    InvalidPayload(#[from] ContractError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server loop failed
    #[error("server error: {0}")]
    Serve(String),

    /// The detached wait task did not finish normally
    #[error("internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AgentError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AgentError::InvalidPayload(_) => codes::INVALID_PAYLOAD,
            _ => codes::INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type for agent operations
pub type AgentResult<T> = Result<T, AgentError>;
