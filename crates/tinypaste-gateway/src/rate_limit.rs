//! Per-client admission for the `/pastes` routes.
//!
//! Every response on a limited route carries the `RateLimit-*` headers,
//! including the 429 produced when the window is full.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tinypaste_ratelimit::RateDecision;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

pub const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

const UNKNOWN_CLIENT: &str = "unknown";

pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = client_token(&request);
    let decision = state.limiter().check(&client);

    let mut response = if decision.is_allowed() {
        next.run(request).await
    } else {
        debug!(client = %client, reset_at = %decision.reset_at, "rate limit reached");
        AppError::RateLimited.into_response()
    };
    apply_headers(response.headers_mut(), &decision);
    response
}

/// Clients are keyed by peer IP; requests without connect info share one bucket.
fn client_token(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(
        RATELIMIT_RESET,
        HeaderValue::from(decision.reset_epoch_seconds()),
    );
}
