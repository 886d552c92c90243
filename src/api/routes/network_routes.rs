//! Network routes (e.g., /api/network/check, /api/http/request)

use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use crate::api::controller::network::NetworkController;
use crate::api::middleware::rate_limit::{rate_limit, RateLimiter};
use crate::app_state::AppState;

pub fn network_routes(limiter: Arc<RateLimiter>) -> Router<AppState> {
    Router::new()
        .route("/network/check", post(NetworkController::check_network))
        .route("/http/request", post(NetworkController::make_http_request))
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit))
}
