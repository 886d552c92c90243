use std::time::Instant;

use tracing::{error, info, warn};

use crate::api::dto::k8s_pod_delete_dto::DeletePodResponse;
use crate::core::client::cluster_client::{ClusterClient, ClusterError};

/// Deletes one pod. Single attempt; every failure is folded into the response.
pub async fn delete_pod(cluster: &dyn ClusterClient, name: &str, namespace: &str) -> DeletePodResponse {
    let started = Instant::now();

    if let Err(err) = cluster.load_config().await {
        error!(pod_name = name, namespace, error = %err, "Kubernetes configuration unavailable");
        return DeletePodResponse::failed(format!("unable to load cluster configuration: {err}"));
    }

    match cluster.delete_pod(name, namespace).await {
        Ok(()) => {
            info!(
                pod_name = name,
                namespace,
                total_time_ms = started.elapsed().as_millis() as u64,
                "Successfully deleted Kubernetes pod"
            );
            DeletePodResponse::deleted(format!(
                "Pod {name} in namespace {namespace} deleted successfully"
            ))
        }
        Err(err) if err.is_not_found() => {
            warn!(pod_name = name, namespace, "Pod not found for deletion");
            DeletePodResponse::failed(format!("Pod {name} not found in namespace {namespace}"))
        }
        Err(err) => {
            error!(pod_name = name, namespace, error = %err, "Failed to delete Kubernetes pod");
            let detail = match &err {
                ClusterError::Api { reason, .. } => reason.clone(),
                other => other.to_string(),
            };
            DeletePodResponse::failed(format!("Failed to delete pod: {detail}"))
        }
    }
}
