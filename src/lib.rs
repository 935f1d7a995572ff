pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod registry;
pub mod state;
pub mod store;
pub mod validation;
pub mod verifier;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use crate::handlers::{check_submission_handler, health_handler, metrics_handler, submit_handler};
use crate::state::AppState;

// creating the router with routes; /api is behind the guard
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/submit-application", post(submit_handler))
        .route("/check-submission", get(check_submission_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::api_guard,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest("/api", api)
        .with_state(state)
}
