use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::api::dto::k8s_info_dto::NamespaceListResponse;
use crate::core::client::cluster_client::ClusterClient;

/// Lists namespace names sorted alphabetically.
pub async fn get_k8s_namespaces(cluster: &dyn ClusterClient, timeout: Duration) -> NamespaceListResponse {
    let started = Instant::now();

    let result = match cluster.load_config().await {
        Ok(()) => cluster.list_namespaces(None, timeout).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(mut namespaces) => {
            namespaces.sort();
            info!(
                namespace_count = namespaces.len(),
                total_time_ms = started.elapsed().as_millis() as u64,
                "Retrieved Kubernetes namespaces"
            );
            NamespaceListResponse {
                namespaces,
                error: None,
            }
        }
        Err(err) => {
            error!(error = %err, "Failed to list Kubernetes namespaces");
            NamespaceListResponse {
                namespaces: Vec::new(),
                error: Some(err.user_message()),
            }
        }
    }
}
