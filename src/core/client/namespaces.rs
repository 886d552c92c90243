use std::time::Duration;

use kube::api::ListParams;
use kube::{Api, Client};
use tracing::debug;

use crate::core::client::cluster_client::ClusterError;
use crate::core::client::kube_resources::Namespace;

/// Fetch namespace names, optionally capped at `limit`
pub async fn fetch_namespace_names(
    client: &Client,
    limit: Option<usize>,
    timeout: Duration,
) -> Result<Vec<String>, ClusterError> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    let timeout_secs = u32::try_from(timeout.as_secs()).unwrap_or(u32::MAX).max(1);
    let mut params = ListParams::default().timeout(timeout_secs);
    if let Some(limit) = limit {
        params = params.limit(u32::try_from(limit).unwrap_or(u32::MAX).max(1));
    }

    let namespace_list = tokio::time::timeout(timeout, namespaces.list(&params))
        .await
        .map_err(|_| ClusterError::Timeout(timeout))??;

    debug!("Discovered {} namespace(s)", namespace_list.items.len());

    let names = namespace_list
        .items
        .into_iter()
        .filter_map(|n| n.metadata.name)
        .collect();

    Ok(names)
}
