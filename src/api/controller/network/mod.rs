//! Network controller: TCP reachability and limited outbound HTTP

use axum::extract::State;
use axum::Json;

use crate::api::dto::network_dto::{
    CommandResponse, HttpRequestDto, HttpResponseDto, NetworkCheckRequest,
};
use crate::api::util::json::ValidatedJson;
use crate::app_state::AppState;
use crate::errors::{internal_error, AppError};

pub struct NetworkController;

impl NetworkController {
    pub async fn check_network(
        State(state): State<AppState>,
        ValidatedJson(check): ValidatedJson<NetworkCheckRequest>,
    ) -> Result<Json<CommandResponse>, AppError> {
        let port = check
            .port()
            .ok_or_else(|| internal_error(format!("port {} passed validation", check.port)))?;
        Ok(Json(state.network_service.check_network(&check.host, port).await))
    }

    pub async fn make_http_request(
        State(state): State<AppState>,
        ValidatedJson(request): ValidatedJson<HttpRequestDto>,
    ) -> Json<HttpResponseDto> {
        Json(state.network_service.make_http_request(&request).await)
    }
}
