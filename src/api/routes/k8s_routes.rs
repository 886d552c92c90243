//! Kubernetes routes (e.g., /api/kubernetes/*)

use std::sync::Arc;

use axum::{middleware, routing::{get, post}, Router};

use crate::api::controller::k8s::diagnostic::K8sDiagnosticController;
use crate::api::controller::k8s::namespace::K8sNamespaceController;
use crate::api::controller::k8s::pod::K8sPodController;
use crate::api::middleware::rate_limit::{rate_limit, RateLimiter};
use crate::app_state::AppState;

pub fn k8s_routes(limiter: Arc<RateLimiter>) -> Router<AppState> {
    let limited = Router::new()
        .route("/pods", get(K8sPodController::list_k8s_pods))
        .route("/pods/delete", post(K8sPodController::delete_k8s_pod))
        .route_layer(middleware::from_fn_with_state(limiter, rate_limit));

    Router::new()
        .route("/namespaces", get(K8sNamespaceController::get_k8s_namespaces))
        .route("/diagnostic", get(K8sDiagnosticController::run_k8s_diagnostic))
        .merge(limited)
}
