use axum::{routing::get, Json, Router};
use http::{HeaderValue, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{warn, Level};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::errors::AppError;

/// Build the main application router
pub fn app_router(state: AppState, config: &AppConfig) -> Router {
    let limiter = state.rate_limiter.clone();

    let api = Router::new()
        .merge(crate::api::routes::system_routes::system_routes(limiter.clone()))
        .merge(crate::api::routes::network_routes::network_routes(limiter.clone()))
        .nest("/kubernetes", crate::api::routes::k8s_routes::k8s_routes(limiter));

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .fallback(handler_404)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &Request<_>| {
                            tracing::info_span!(
                                "http_request",
                                request_id = %Uuid::new_v4(),
                                method = %req.method(),
                                uri = %req.uri(),
                            )
                        })
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors_layer(&config.cors_origins))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    config.request_timeout,
                )),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::HEAD,
            Method::PATCH,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Infrastructure Debugger API" }))
}

async fn handler_404() -> AppError {
    AppError::NotFound("The requested resource was not found".to_string())
}
