//! System controller: health and readiness probes

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::dto::system_dto::ReadyResponse;
use crate::app_state::AppState;
use crate::domain::system::service::health_service;

pub struct SystemController;

impl SystemController {
    /// Answers with the first unhealthy service's status code.
    pub async fn health(State(state): State<AppState>) -> Response {
        let report = state.system_service.health().await;
        let status =
            StatusCode::from_u16(report.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(report.body)).into_response()
    }

    pub async fn ready() -> Json<ReadyResponse> {
        Json(health_service::readiness())
    }

    pub async fn ready_backend() -> Json<ReadyResponse> {
        Json(health_service::backend_readiness())
    }
}
