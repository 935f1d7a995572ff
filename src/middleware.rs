use axum::{
    extract::{Request, State},
    http::header::USER_AGENT,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;
use crate::error::ApiError;
use crate::identity::client_ip;
use crate::metrics::{BLOCKED_AGENTS_TOTAL, RATE_LIMITED_TOTAL};
use crate::state::AppState;

const BLOCKED_AGENTS: [&str; 3] = ["curl", "axios", "python"];

// Scripted clients are turned away before they reach any handler
pub fn is_suspicious_agent(user_agent: &str) -> bool {
    user_agent.is_empty() || BLOCKED_AGENTS.iter().any(|agent| user_agent.contains(agent))
}

// Guard for every /api route: user-agent filter, then per-IP throttle
pub async fn api_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if is_suspicious_agent(user_agent) {
        BLOCKED_AGENTS_TOTAL.inc();
        debug!(user_agent, "blocked suspicious user agent");
        return ApiError::SuspiciousAgent.into_response();
    }

    let ip = client_ip(request.headers()).unwrap_or("unknown");
    if state.ip_limiter.check(ip, state.ip_limit).is_err() {
        RATE_LIMITED_TOTAL.with_label_values(&["ip"]).inc();
        return ApiError::TooManyRequests.into_response();
    }

    next.run(request).await
}
