//! HTTP surface: `GET /` renders an empty form, `POST /` relays a submission.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::body::Body;
use axum::extract::rejection::FormRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Request};
use axum::middleware::{self, Next};
use axum::response::{Html, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::Deserialize;
use tracing::{Instrument, info, warn};

use crate::error::RelayError;
use crate::page;
use crate::relay::{FormRelay, Report};

#[derive(Clone)]
pub struct AppState {
    relay: Arc<FormRelay>,
    requests: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(relay: FormRelay) -> Self {
        Self {
            relay: Arc::new(relay),
            requests: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of requests accepted so far.
    pub fn requests_served(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

/// The form body. `content` may be missing entirely.
#[derive(Debug, Deserialize)]
pub struct Submission {
    pub content: Option<String>,
}

/// Build the app. `max_body_bytes` of `None` accepts form bodies of any size.
pub fn build_router(state: AppState, max_body_bytes: Option<usize>) -> Router {
    let body_limit = match max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };
    Router::new()
        .route("/", get(form_handler).post(submit_handler))
        .route("/healthz", get(healthz_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_tracing_middleware,
        ))
        .layer(body_limit)
        .with_state(state)
}

async fn form_handler() -> Html<String> {
    Html(page::render("", ""))
}

async fn submit_handler(
    State(state): State<AppState>,
    form: Result<Form<Submission>, FormRejection>,
) -> Html<String> {
    let report = match form {
        Ok(Form(submission)) => state.relay.handle(submission.content).await,
        Err(rejection) => {
            // The text is unknown, so there is nothing to stage or analyze
            let err = RelayError::Unreadable(rejection.body_text());
            warn!(error = %err, status = rejection.status().as_u16(), "form body rejected");
            Report::failed(String::new(), &err)
        }
    };
    Html(report.render())
}

async fn healthz_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "analyzer": state.relay.analyzer_name(),
    }))
}

async fn request_tracing_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let request_id = state.requests.fetch_add(1, Ordering::Relaxed) + 1;
    let span = tracing::info_span!(
        "http.request",
        request_id,
        method = %request.method(),
        route = %request.uri().path(),
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::mock::ScriptedAnalyzer;
    use crate::scratch::ScratchConfig;
    use std::time::Duration;

    #[test]
    fn state_starts_with_zero_requests() {
        let relay = FormRelay::new(
            Arc::new(ScriptedAnalyzer::new(["x"])),
            ScratchConfig::default(),
            Duration::from_secs(1),
        );
        let state = AppState::new(relay);
        assert_eq!(state.requests_served(), 0);
        assert_eq!(state.clone().requests_served(), 0);
    }

    #[tokio::test]
    async fn form_handler_renders_empty_fields() {
        let Html(body) = form_handler().await;
        assert!(body.contains("rows=\"40\" cols=\"80\">\n</textarea>"));
        assert!(body.contains("readonly>\n</textarea>"));
    }
}
