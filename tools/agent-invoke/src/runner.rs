//! Sequential test-case runner.
//!
//! Cases run one at a time. A failed case is logged with its elapsed time and
//! the runner moves on; nothing propagates out of [`run_suite`].

use std::time::{Duration, Instant};

use agent_telemetry::{component_span, log_event};
use chrono::Utc;
use shared_types::InvocationRequest;
use tracing::Instrument;

use crate::client::{new_session_id, AgentInvoker, InvocationOutcome};

const COMPONENT: &str = "runner";

/// Durations exercised when none are given
pub const DEFAULT_DURATIONS: &[u64] = &[300];

/// Pause between consecutive cases
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(5);

/// Allowed drift between measured and requested duration when verifying
pub const VERIFY_TOLERANCE: Duration = Duration::from_secs(2);

/// Which cases to run and how
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    pub durations: Vec<u64>,
    pub pause: Duration,
    /// Compare elapsed time with the requested duration (never fails a case)
    pub verify: bool,
    /// Region logged with each case
    pub region: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            durations: DEFAULT_DURATIONS.to_vec(),
            pause: DEFAULT_PAUSE,
            verify: false,
            region: crate::config::DEFAULT_REGION.to_string(),
        }
    }
}

/// Result of one case
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub duration_seconds: u64,
    pub session_id: String,
    pub elapsed: Duration,
    pub success: bool,
    pub error: Option<String>,
    /// `Some` only when verification ran against a parseable body
    pub verified: Option<bool>,
}

/// Results of a whole run, in case order
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn succeeded(&self) -> usize {
        self.cases.iter().filter(|c| c.success).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

/// Run every case in order, pausing between them.
pub async fn run_suite(invoker: &AgentInvoker, suite: &SuiteConfig) -> SuiteReport {
    let mut report = SuiteReport::default();

    for (index, &duration_seconds) in suite.durations.iter().enumerate() {
        if index > 0 && !suite.pause.is_zero() {
            log_event!(
                info,
                COMPONENT,
                "Pausing before next case",
                pause_secs = suite.pause.as_secs()
            );
            tokio::time::sleep(suite.pause).await;
        }

        let span = component_span!("invoke_case", case = index + 1, duration_seconds);
        let case = run_case(invoker, duration_seconds, suite)
            .instrument(span)
            .await;
        report.cases.push(case);
    }

    log_event!(
        info,
        COMPONENT,
        "All cases finished",
        total = report.cases.len(),
        succeeded = report.succeeded(),
        failed = report.failed()
    );
    report
}

/// Run a single case; failures are logged and recorded, never returned.
pub async fn run_case(
    invoker: &AgentInvoker,
    duration_seconds: u64,
    suite: &SuiteConfig,
) -> CaseReport {
    let session_id = new_session_id();
    let request = InvocationRequest::sleep_test(duration_seconds);

    log_event!(
        info,
        COMPONENT,
        "Invoking agent",
        duration_seconds,
        session_id = %session_id,
        url = %invoker.url(),
        region = %suite.region,
        started_at = %Utc::now()
    );

    let started = Instant::now();
    match invoker.invoke(&request, &session_id).await {
        Ok(outcome) => {
            log_event!(
                info,
                COMPONENT,
                "Agent responded",
                elapsed_secs = outcome.elapsed.as_secs_f64(),
                status = %outcome.status,
                headers = ?outcome.headers,
                body = %outcome.body_text(),
                completed_at = %outcome.completed_at
            );

            let verified = suite
                .verify
                .then(|| verify_outcome(&outcome, duration_seconds))
                .flatten();

            CaseReport {
                duration_seconds,
                session_id,
                elapsed: outcome.elapsed,
                success: true,
                error: None,
                verified,
            }
        }
        Err(e) => {
            let elapsed = started.elapsed();
            log_event!(
                error,
                COMPONENT,
                "Invocation failed",
                duration_seconds,
                elapsed_secs = elapsed.as_secs_f64(),
                error = %e
            );

            CaseReport {
                duration_seconds,
                session_id,
                elapsed,
                success: false,
                error: Some(e.to_string()),
                verified: None,
            }
        }
    }
}

/// Check elapsed time against the requested duration. `None` when the body
/// is not JSON.
fn verify_outcome(outcome: &InvocationOutcome, duration_seconds: u64) -> Option<bool> {
    if let Err(e) = serde_json::from_slice::<serde_json::Value>(&outcome.body) {
        log_event!(warn, COMPONENT, "Response body is not JSON; skipping verification", error = %e);
        return None;
    }

    let expected = Duration::from_secs(duration_seconds);
    let within = within_tolerance(outcome.elapsed, expected);
    if within {
        log_event!(
            info,
            COMPONENT,
            "Duration verification PASSED",
            expected_secs = duration_seconds,
            elapsed_secs = outcome.elapsed.as_secs_f64()
        );
    } else {
        log_event!(
            warn,
            COMPONENT,
            "Elapsed time differs from requested duration",
            expected_secs = duration_seconds,
            elapsed_secs = outcome.elapsed.as_secs_f64(),
            tolerance_secs = VERIFY_TOLERANCE.as_secs()
        );
    }
    Some(within)
}

fn within_tolerance(elapsed: Duration, expected: Duration) -> bool {
    let drift = if elapsed > expected {
        elapsed - expected
    } else {
        expected - elapsed
    };
    drift <= VERIFY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn outcome(body: &str, elapsed: Duration) -> InvocationOutcome {
        InvocationOutcome {
            session_id: "sleep-test-1-1000000".into(),
            request_id: "req".into(),
            status: StatusCode::OK,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
            elapsed,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_tolerance_window() {
        let expected = Duration::from_secs(300);
        assert!(within_tolerance(Duration::from_secs(300), expected));
        assert!(within_tolerance(Duration::from_millis(301_900), expected));
        assert!(within_tolerance(Duration::from_secs(298), expected));
        assert!(!within_tolerance(Duration::from_millis(302_500), expected));
        assert!(!within_tolerance(Duration::from_secs(297), expected));
    }

    #[test]
    fn test_verification_skips_non_json() {
        let outcome = outcome("<html>", Duration::from_secs(10));
        assert_eq!(verify_outcome(&outcome, 10), None);
    }

    #[test]
    fn test_verification_flags_drift() {
        let body = r#"{"status":"completed","duration_seconds":10}"#;
        assert_eq!(verify_outcome(&outcome(body, Duration::from_secs(10)), 10), Some(true));
        assert_eq!(verify_outcome(&outcome(body, Duration::from_secs(20)), 10), Some(false));
    }

    #[test]
    fn test_report_counts() {
        let case = |success| CaseReport {
            duration_seconds: 0,
            session_id: String::new(),
            elapsed: Duration::ZERO,
            success,
            error: None,
            verified: None,
        };
        let report = SuiteReport {
            cases: vec![case(true), case(false), case(true)],
        };
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn test_default_suite() {
        let suite = SuiteConfig::default();
        assert_eq!(suite.durations, vec![300]);
        assert_eq!(suite.pause, Duration::from_secs(5));
        assert!(!suite.verify);
    }
}
