//! Agent runtime service - hosts the handler behind HTTP.
//!
//! Routes:
//! - `POST /invocations`: run one invocation, respond with its `InvocationResult`
//! - `GET /ping`: health probe, `HealthyBusy` while any wait is in flight

use crate::domain::config::AgentConfig;
use crate::domain::error::{AgentError, AgentResult};
use crate::domain::handler::SleepHandler;
use crate::middleware::{AgentMetrics, TracingLayer};
use crate::ports::{Clock, SystemClock};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared_types::{
    InvocationContext, InvocationRequest, InvocationResult, INVOCATIONS_PATH, PING_PATH,
    REQUEST_ID_HEADER, SESSION_ID_HEADER,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{info, warn};

/// Agent runtime service state
pub struct AgentService {
    config: AgentConfig,
    handler: Arc<SleepHandler>,
    metrics: Arc<AgentMetrics>,
}

impl AgentService {
    /// Create a new agent service on the wall clock
    pub fn new(config: AgentConfig) -> AgentResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new agent service with an explicit time source
    pub fn with_clock(config: AgentConfig, clock: Arc<dyn Clock>) -> AgentResult<Self> {
        config
            .validate()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        let handler = SleepHandler::new(clock)
            .with_budget(config.budget())
            .with_default_duration(config.wait.default_duration_secs);

        Ok(Self {
            config,
            handler: Arc::new(handler),
            metrics: Arc::new(AgentMetrics::new()),
        })
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<AgentMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let state = AppState {
            handler: Arc::clone(&self.handler),
            metrics: Arc::clone(&self.metrics),
        };

        let middleware = ServiceBuilder::new()
            .layer(TracingLayer::new())
            .layer(DefaultBodyLimit::max(self.config.limits.max_request_size));

        Router::new()
            .route(INVOCATIONS_PATH, post(handle_invocation))
            .route(PING_PATH, get(handle_ping))
            .layer(middleware)
            .with_state(state)
    }

    /// Bind the configured address
    pub async fn bind(&self) -> AgentResult<TcpListener> {
        let addr = self.config.http_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|e| AgentError::Bind(format!("{}: {}", addr, e)))
    }

    /// Serve on `listener` until `shutdown` resolves.
    ///
    /// Shutdown stops accepting connections; waits already in flight run to
    /// completion.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> AgentResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener
            .local_addr()
            .map_err(|e| AgentError::Bind(e.to_string()))?;
        info!(addr = %local_addr, "Sleep agent listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| AgentError::Serve(e.to_string()))?;

        info!("Sleep agent stopped");
        Ok(())
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> AgentResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    handler: Arc<SleepHandler>,
    metrics: Arc<AgentMetrics>,
}

/// Health probe status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PingStatus {
    Healthy,
    HealthyBusy,
}

/// Health probe body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: PingStatus,
    /// Unix seconds of the last idle/busy transition
    pub time_of_last_update: i64,
}

/// Handle an invocation
async fn handle_invocation(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AgentResult<Json<InvocationResult>> {
    let request = InvocationRequest::from_body(&body).map_err(|e| {
        state.metrics.record_rejected();
        warn!(error = %e, "Rejected invocation payload");
        AgentError::from(e)
    })?;
    let context = context_from_headers(&headers);

    // Detached so a dropped connection cannot cancel the wait
    let guard = AgentMetrics::track(&state.metrics);
    let handler = Arc::clone(&state.handler);
    let task = tokio::spawn(async move {
        let _guard = guard;
        handler.invoke(request, context).await
    });

    let result = task
        .await
        .map_err(|e| AgentError::Internal(e.to_string()))?;

    Ok(Json(result))
}

/// Health check endpoint
async fn handle_ping(State(state): State<AppState>) -> Json<PingResponse> {
    let snapshot = state.metrics.snapshot();
    let status = if snapshot.in_flight > 0 {
        PingStatus::HealthyBusy
    } else {
        PingStatus::Healthy
    };

    Json(PingResponse {
        status,
        time_of_last_update: snapshot.last_status_change,
    })
}

/// Build the call context from runtime headers
fn context_from_headers(headers: &HeaderMap) -> InvocationContext {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
    };

    InvocationContext::new(header(SESSION_ID_HEADER), header(REQUEST_ID_HEADER))
}
