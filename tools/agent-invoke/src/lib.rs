//! Agent-Invoke: timed invocation tool for the sleep agent
//!
//! Sends a sequence of wait requests to the agent and records how long each
//! round trip took, so the timeout behaviour of everything in between can be
//! observed.
//!
//! ```text
//! ┌──────────────┐  POST /invocations   ┌──────────────┐
//! │ agent-invoke │ ───────────────────▶ │ sleep-agent  │
//! │  run_suite   │ ◀─────────────────── │ (waits d s)  │
//! └──────────────┘   InvocationResult   └──────────────┘
//!   read 900s / connect 60s / 1 attempt
//! ```

pub mod client;
pub mod config;
pub mod runner;

pub use client::{new_session_id, AgentInvoker, InvocationOutcome, InvokeError};
pub use config::{ConfigError, InvokeConfig, KeepAliveConfig, TransportConfig};
pub use runner::{run_case, run_suite, CaseReport, SuiteConfig, SuiteReport};
