use axum::extract::State;
use axum::Json;

use crate::api::dto::k8s_info_dto::NamespaceListResponse;
use crate::app_state::AppState;

pub struct K8sNamespaceController;

impl K8sNamespaceController {
    pub async fn get_k8s_namespaces(State(state): State<AppState>) -> Json<NamespaceListResponse> {
        Json(state.k8s_service.get_k8s_namespaces().await)
    }
}
