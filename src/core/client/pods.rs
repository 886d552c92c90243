use std::time::Duration;

use kube::api::{DeleteParams, ListParams};
use kube::{Api, Client};
use tracing::debug;

use crate::core::client::cluster_client::ClusterError;
use crate::core::client::kube_resources::Pod;

const DELETE_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch up to `limit` pods across all namespaces
pub async fn fetch_pods(
    client: &Client,
    field_selector: Option<&str>,
    limit: usize,
    timeout: Duration,
) -> Result<Vec<Pod>, ClusterError> {
    let pods: Api<Pod> = Api::all(client.clone());
    let items = list_with_timeout(&pods, field_selector, limit, timeout).await?;

    debug!("Discovered {} pod(s)", items.len());
    Ok(items)
}

/// Fetch up to `limit` pods in a specific namespace
pub async fn fetch_pods_by_namespace(
    client: &Client,
    namespace: &str,
    field_selector: Option<&str>,
    limit: usize,
    timeout: Duration,
) -> Result<Vec<Pod>, ClusterError> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let items = list_with_timeout(&pods, field_selector, limit, timeout).await?;

    debug!("Discovered {} pod(s) in namespace '{}'", items.len(), namespace);
    Ok(items)
}

/// Delete a single pod by name and namespace
pub async fn delete_pod_by_name_and_namespace(
    client: &Client,
    namespace: &str,
    pod_name: &str,
) -> Result<(), ClusterError> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);

    tokio::time::timeout(DELETE_TIMEOUT, pods.delete(pod_name, &DeleteParams::default()))
        .await
        .map_err(|_| ClusterError::Timeout(DELETE_TIMEOUT))??;

    debug!("Deleted pod: {}/{}", namespace, pod_name);
    Ok(())
}

/// The cluster-side `timeoutSeconds` and a local deadline both bound the call.
async fn list_with_timeout(
    api: &Api<Pod>,
    field_selector: Option<&str>,
    limit: usize,
    timeout: Duration,
) -> Result<Vec<Pod>, ClusterError> {
    let params = list_params(field_selector, limit, timeout);

    let list = tokio::time::timeout(timeout, api.list(&params))
        .await
        .map_err(|_| ClusterError::Timeout(timeout))??;

    Ok(list.items)
}

fn list_params(field_selector: Option<&str>, limit: usize, timeout: Duration) -> ListParams {
    let limit = u32::try_from(limit).unwrap_or(u32::MAX).max(1);
    let timeout_secs = u32::try_from(timeout.as_secs()).unwrap_or(u32::MAX).max(1);

    let mut params = ListParams::default().limit(limit).timeout(timeout_secs);
    if let Some(selector) = field_selector {
        params = params.fields(selector);
    }
    params
}
