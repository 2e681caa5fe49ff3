//! Middleware stack for the agent runtime.
//!
//! Layer order: Request → Tracing → BodyLimit → Handler
//!
//! The body limit is axum's `DefaultBodyLimit`, applied in `service.rs`.

pub mod metrics;
pub mod tracing;

pub use metrics::{AgentMetrics, InFlightGuard, MetricsSnapshot};
pub use tracing::TracingLayer;
