use axum::extract::State;
use axum::Json;

use crate::api::dto::k8s_info_dto::DiagnosticResponse;
use crate::app_state::AppState;

pub struct K8sDiagnosticController;

impl K8sDiagnosticController {
    pub async fn run_k8s_diagnostic(State(state): State<AppState>) -> Json<DiagnosticResponse> {
        Json(state.k8s_service.run_k8s_diagnostic().await)
    }
}
