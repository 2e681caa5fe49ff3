//! Domain layer for the sleep agent.
//!
//! Contains configuration, error types, and the wait handler.

pub mod config;
pub mod error;
pub mod handler;

pub use config::*;
pub use error::*;
pub use handler::SleepHandler;
