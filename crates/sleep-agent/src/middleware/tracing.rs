//! Request tracing middleware.
//!
//! Opens one span per HTTP request carrying the session id, and records the
//! response status on it.

use axum::{body::Body, http::Request, response::Response};
use shared_types::SESSION_ID_HEADER;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{info_span, Instrument, Span};

/// Tracing layer that creates spans for each request
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let span = info_span!(
            "agent_request",
            http.method = %req.method(),
            http.target = %req.uri().path(),
            session_id = %session_id_of(&req),
            http.status_code = tracing::field::Empty,
            success = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let result = inner.call(req).await;
                if let Ok(response) = &result {
                    let status = response.status();
                    let span = Span::current();
                    span.record("http.status_code", status.as_u16());
                    span.record("success", status.is_success());
                }
                result
            }
            .instrument(span),
        )
    }
}

/// Session id the runtime attached, or `-` for direct calls
fn session_id_of<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or("-")
}
