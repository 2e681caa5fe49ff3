//! # Error Types
//!
//! Errors raised while decoding the invocation contract.

use thiserror::Error;

/// A request body that does not match `InvocationRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// Body is not valid JSON.
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Body is valid JSON but not an object.
    #[error("Payload must be a JSON object")]
    NotAnObject,

    /// A known field has the wrong type (e.g. a negative duration).
    #[error("Invalid payload field: {0}")]
    InvalidField(String),
}
