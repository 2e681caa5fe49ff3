//! # Wire Constants
//!
//! Routes and header names of the agent runtime HTTP contract.

/// Route that accepts an invocation payload.
pub const INVOCATIONS_PATH: &str = "/invocations";

/// Health probe route.
pub const PING_PATH: &str = "/ping";

/// Header carrying the caller-generated session identifier.
pub const SESSION_ID_HEADER: &str = "x-amzn-bedrock-agentcore-runtime-session-id";

/// Header carrying the per-call request identifier.
pub const REQUEST_ID_HEADER: &str = "x-amzn-request-id";

/// Qualifier used when addressing a runtime through the data-plane path.
pub const DEFAULT_QUALIFIER: &str = "DEFAULT";

/// Default port the agent runtime listens on.
pub const DEFAULT_AGENT_PORT: u16 = 8080;
