//! Ports (hexagonal boundaries) for the sleep agent.

pub mod outbound;

pub use outbound::{Clock, SystemClock, TokioClock};
