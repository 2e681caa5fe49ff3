//! # Shared Types Crate
//!
//! The contract between the sleep agent and the invocation tool.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: request/result records and header names are
//!   defined once and used by both the agent runtime and the client.
//! - **Transient Records**: nothing here is persisted; a request and its
//!   result live for exactly one invocation.
//! - **Explicit Budget**: the timeouts the client waits with are a value
//!   (`TimeoutBudget`), not an assumption baked into either side.

pub mod budget;
pub mod entities;
pub mod errors;
pub mod wire;

pub use budget::TimeoutBudget;
pub use entities::*;
pub use errors::*;
pub use wire::*;
