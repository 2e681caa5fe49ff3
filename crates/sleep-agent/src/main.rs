//! # Sleep Agent
//!
//! Entry point for the agent runtime.
//!
//! ## Startup Sequence
//!
//! 1. Initialize structured logging
//! 2. Load and validate configuration from the environment
//! 3. Bind the HTTP listener
//! 4. Serve until Ctrl+C; waits in flight finish before exit

use anyhow::{Context, Result};
use tracing::{info, warn};

use agent_telemetry::{init_telemetry, TelemetryConfig};
use sleep_agent::{agent_version, AgentConfig, AgentService};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = init_telemetry(TelemetryConfig::from_env("sleep-agent"))
        .context("failed to initialize telemetry")?;

    let config = AgentConfig::from_env().context("invalid agent configuration")?;
    let budget = config.budget();

    info!(
        service = %telemetry.service_name(),
        version = %agent_version(),
        addr = %config.http_addr(),
        default_duration_secs = config.wait.default_duration_secs,
        read_timeout_secs = budget.read_timeout.as_secs(),
        connect_timeout_secs = budget.connect_timeout.as_secs(),
        "Starting sleep agent"
    );

    let service = AgentService::new(config).context("failed to build agent service")?;
    service
        .run(shutdown_signal())
        .await
        .context("agent runtime failed")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C; shutting down"),
    }
}
