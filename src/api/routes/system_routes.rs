//! System routes (e.g., /api/health, /api/ready)

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::api::controller::system::SystemController;
use crate::api::middleware::rate_limit::{rate_limit, RateLimiter};
use crate::app_state::AppState;

pub fn system_routes(limiter: Arc<RateLimiter>) -> Router<AppState> {
    let limited = Router::new()
        .route("/health", get(SystemController::health))
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit));

    Router::new()
        .route("/ready", get(SystemController::ready))
        .route("/ready/backend", get(SystemController::ready_backend))
        .merge(limited)
}
