//! Agent-Invoke: runs timed wait cases against the sleep agent.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use agent_invoke::{
    run_suite, AgentInvoker, InvokeConfig, KeepAliveConfig, SuiteConfig, TransportConfig,
};
use agent_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::TimeoutBudget;

/// Agent-Invoke: timed invocation tool for the sleep agent
#[derive(Parser, Debug)]
#[command(name = "agent-invoke")]
#[command(about = "Invoke the sleep agent with long waits and report round-trip timing")]
struct Args {
    /// Runtime or agent base URL
    #[arg(short, long, env = "AGENT_INVOKE_ENDPOINT", default_value = "http://127.0.0.1:8080")]
    endpoint: String,

    /// Agent runtime resource identifier; selects the runtime data-plane path
    #[arg(long, env = "AGENT_INVOKE_RUNTIME_ARN")]
    agent_runtime_arn: Option<String>,

    /// Runtime endpoint qualifier
    #[arg(long, env = "AGENT_INVOKE_QUALIFIER", default_value = "DEFAULT")]
    qualifier: String,

    /// Region, logged with each case
    #[arg(long, env = "AGENT_INVOKE_REGION", default_value = "us-west-2")]
    region: String,

    /// Bearer token sent with each call
    #[arg(long, env = "AGENT_INVOKE_BEARER_TOKEN", hide_env_values = true)]
    bearer_token: Option<String>,

    /// Durations to request, in seconds (comma separated)
    #[arg(short, long, env = "AGENT_INVOKE_DURATIONS", value_delimiter = ',', default_value = "300")]
    durations: Vec<u64>,

    /// Pause between cases, in seconds
    #[arg(long, env = "AGENT_INVOKE_PAUSE_SECS", default_value = "5")]
    pause_secs: u64,

    /// Compare elapsed time with the requested duration (±2s)
    #[arg(long, env = "AGENT_INVOKE_VERIFY")]
    verify: bool,

    /// Read timeout in seconds
    #[arg(long, env = "AGENT_INVOKE_READ_TIMEOUT_SECS", default_value = "900")]
    read_timeout_secs: u64,

    /// Connect timeout in seconds
    #[arg(long, env = "AGENT_INVOKE_CONNECT_TIMEOUT_SECS", default_value = "60")]
    connect_timeout_secs: u64,

    /// Total attempts per case
    #[arg(long, env = "AGENT_INVOKE_MAX_ATTEMPTS", default_value = "1")]
    max_attempts: u32,

    /// Enable TCP keep-alive probing
    #[arg(long, env = "AGENT_INVOKE_KEEP_ALIVE")]
    keep_alive: bool,

    /// Idle seconds before the first keep-alive probe
    #[arg(long, env = "AGENT_INVOKE_KEEP_ALIVE_IDLE_SECS", default_value = "60")]
    keep_alive_idle_secs: u64,

    /// Seconds between keep-alive probes
    #[arg(long, env = "AGENT_INVOKE_KEEP_ALIVE_INTERVAL_SECS", default_value = "10")]
    keep_alive_interval_secs: u64,

    /// Unanswered probes before the connection is dropped
    #[arg(long, env = "AGENT_INVOKE_KEEP_ALIVE_COUNT", default_value = "6")]
    keep_alive_count: u32,
}

impl Args {
    fn invoke_config(&self) -> InvokeConfig {
        let keep_alive = self.keep_alive.then(|| KeepAliveConfig {
            idle: Duration::from_secs(self.keep_alive_idle_secs),
            interval: Duration::from_secs(self.keep_alive_interval_secs),
            count: self.keep_alive_count,
        });

        InvokeConfig {
            endpoint: self.endpoint.clone(),
            agent_runtime_arn: self.agent_runtime_arn.clone(),
            qualifier: self.qualifier.clone(),
            region: self.region.clone(),
            bearer_token: self.bearer_token.clone(),
            transport: TransportConfig {
                budget: TimeoutBudget::new(
                    Duration::from_secs(self.read_timeout_secs),
                    Duration::from_secs(self.connect_timeout_secs),
                ),
                max_attempts: self.max_attempts,
                keep_alive,
            },
        }
    }

    fn suite_config(&self) -> SuiteConfig {
        SuiteConfig {
            durations: self.durations.clone(),
            pause: Duration::from_secs(self.pause_secs),
            verify: self.verify,
            region: self.region.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let telemetry = init_telemetry(TelemetryConfig::from_env("agent-invoke"))
        .context("failed to initialize telemetry")?;

    let config = args.invoke_config();
    config.validate().context("invalid invocation settings")?;
    let suite = args.suite_config();

    let invoker = AgentInvoker::new(&config).context("failed to build HTTP client")?;
    info!(
        service = %telemetry.service_name(),
        url = %invoker.url(),
        durations = ?suite.durations,
        read_timeout_secs = args.read_timeout_secs,
        connect_timeout_secs = args.connect_timeout_secs,
        max_attempts = args.max_attempts,
        keep_alive = args.keep_alive,
        "Starting invocation run"
    );

    let report = run_suite(&invoker, &suite).await;
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Invocation run finished"
    );

    Ok(())
}
