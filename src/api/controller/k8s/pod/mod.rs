use axum::extract::{Query, State};
use axum::Json;
use tracing::debug;

use crate::api::dto::k8s_pod_delete_dto::{DeletePodRequest, DeletePodResponse};
use crate::api::dto::k8s_pod_query_request_dto::K8sPodQueryRequestDto;
use crate::api::util::json::ValidatedJson;
use crate::app_state::AppState;
use crate::domain::k8s::model::pod_page::PodPage;

pub struct K8sPodController;

impl K8sPodController {
    /// Paginated pod listing; cluster failures are reported in the body.
    pub async fn list_k8s_pods(
        State(state): State<AppState>,
        Query(query): Query<K8sPodQueryRequestDto>,
    ) -> Json<PodPage> {
        debug!(?query, "Kubernetes pods endpoint called");
        Json(state.k8s_service.list_pods(query.into_pod_query()).await)
    }

    pub async fn delete_k8s_pod(
        State(state): State<AppState>,
        ValidatedJson(request): ValidatedJson<DeletePodRequest>,
    ) -> Json<DeletePodResponse> {
        Json(
            state
                .k8s_service
                .delete_pod(&request.name, &request.namespace)
                .await,
        )
    }
}
