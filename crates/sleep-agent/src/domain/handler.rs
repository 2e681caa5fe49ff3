//! The agent entrypoint: wait for the requested duration, then report.
//!
//! The wait is unconditional. Nothing checks for shutdown or caller
//! disconnects while it runs; the runtime spawns each invocation on its own
//! task so a dropped connection does not cut it short either.

use agent_telemetry::log_event;
use shared_types::{
    InvocationContext, InvocationRequest, InvocationResult, TimeoutBudget, DEFAULT_DURATION_SECS,
};
use std::sync::Arc;
use std::time::Duration;

use crate::ports::{Clock, SystemClock};

const COMPONENT: &str = "handler";

/// Handles one invocation at a time per call; holds no mutable state.
#[derive(Clone)]
pub struct SleepHandler {
    clock: Arc<dyn Clock>,
    budget: TimeoutBudget,
    default_duration_secs: u64,
}

impl SleepHandler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            budget: TimeoutBudget::default(),
            default_duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    /// Budget callers wait with; waits beyond it are logged, never refused.
    pub fn with_budget(mut self, budget: TimeoutBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Wait used when a payload carries no `duration_seconds`.
    pub fn with_default_duration(mut self, secs: u64) -> Self {
        self.default_duration_secs = secs;
        self
    }

    /// Seconds `request` will wait for.
    pub fn duration_for(&self, request: &InvocationRequest) -> u64 {
        request
            .duration_seconds
            .unwrap_or(self.default_duration_secs)
    }

    /// Block for the requested duration and return the completion record.
    pub async fn invoke(
        &self,
        request: InvocationRequest,
        context: InvocationContext,
    ) -> InvocationResult {
        let duration_seconds = self.duration_for(&request);
        let wait = Duration::from_secs(duration_seconds);

        log_event!(
            info,
            COMPONENT,
            "Sleep agent starting",
            started_at = %self.clock.now(),
            session_id = %context.session_id(),
            request_id = %context.request_id()
        );
        log_event!(
            info,
            COMPONENT,
            "Payload received",
            payload = %serde_json::to_string(&request).unwrap_or_default()
        );

        if !self.budget.admits(wait) {
            log_event!(
                warn,
                COMPONENT,
                "Wait reaches the caller read timeout; the caller will likely give up first",
                duration_seconds,
                read_timeout_secs = self.budget.read_timeout.as_secs()
            );
        }

        log_event!(info, COMPONENT, "Starting wait", duration_seconds);
        tokio::time::sleep(wait).await;

        let completion_time = self.clock.now();
        log_event!(
            info,
            COMPONENT,
            "Sleep agent completed",
            completed_at = %completion_time,
            session_id = %context.session_id()
        );

        InvocationResult::completed(duration_seconds, &context, completion_time)
    }
}

impl Default for SleepHandler {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TokioClock;
    use chrono::SubsecRound;
    use shared_types::InvocationStatus;

    fn handler() -> (SleepHandler, TokioClock) {
        let clock = TokioClock::new();
        (SleepHandler::new(Arc::new(clock)), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_returns_immediately() {
        let (handler, clock) = handler();
        let start = clock.now().trunc_subsecs(6);
        let request = InvocationRequest {
            duration_seconds: Some(0),
            ..Default::default()
        };

        let result = handler.invoke(request, InvocationContext::default()).await;

        assert_eq!(result.status, InvocationStatus::Completed);
        assert_eq!(result.duration_seconds, 0);
        assert!(result.completion_time >= start);
        assert!(result.completion_time - start < chrono::Duration::seconds(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_time_not_before_wait_ends() {
        let (handler, clock) = handler();
        let start = clock.now().trunc_subsecs(6);
        let request = InvocationRequest {
            duration_seconds: Some(300),
            ..Default::default()
        };

        let result = handler.invoke(request, InvocationContext::default()).await;

        assert_eq!(result.duration_seconds, 300);
        assert!(result.completion_time >= start + chrono::Duration::seconds(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_duration_waits_default() {
        let (handler, clock) = handler();
        let start = tokio::time::Instant::now();

        let result = handler
            .invoke(InvocationRequest::default(), InvocationContext::default())
            .await;

        assert_eq!(result.duration_seconds, 280);
        assert!(start.elapsed() >= Duration::from_secs(280));
        assert!(clock.now() >= result.completion_time);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_default_duration() {
        let (handler, _) = handler();
        let handler = handler.with_default_duration(5);

        let result = handler
            .invoke(InvocationRequest::default(), InvocationContext::default())
            .await;

        assert_eq!(result.duration_seconds, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_identifiers_echoed() {
        let (handler, _) = handler();
        let context = InvocationContext::new(Some("sess-42".into()), Some("req-7".into()));
        let request = InvocationRequest {
            duration_seconds: Some(1),
            ..Default::default()
        };

        let result = handler.invoke(request, context).await;

        assert_eq!(result.session_id, "sess-42");
        assert_eq!(result.request_id, "req-7");
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_identifiers_default() {
        let (handler, _) = handler();
        let request = InvocationRequest {
            duration_seconds: Some(1),
            ..Default::default()
        };

        let result = handler.invoke(request, InvocationContext::default()).await;

        assert_eq!(result.session_id, "default");
        assert_eq!(result.request_id, "unknown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_beyond_budget_still_completes() {
        let (handler, _) = handler();
        let handler = handler.with_budget(TimeoutBudget::new(
            Duration::from_secs(10),
            Duration::from_secs(1),
        ));
        let request = InvocationRequest {
            duration_seconds: Some(60),
            ..Default::default()
        };

        let result = handler.invoke(request, InvocationContext::default()).await;

        assert_eq!(result.status, InvocationStatus::Completed);
        assert_eq!(result.duration_seconds, 60);
    }
}
