use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use kube::{Client, Config};
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Where credentials are expected to come from in the current environment.
pub fn detect_config_source() -> &'static str {
    if env::var("KUBERNETES_SERVICE_HOST").is_ok() {
        "in-cluster"
    } else if env::var("KUBECONFIG").is_ok() {
        "kubeconfig (KUBECONFIG)"
    } else {
        "kubeconfig"
    }
}

/// Creates a Kubernetes client from in-cluster service account credentials,
/// falling back to the local kubeconfig.
pub async fn build_kube_client() -> Result<Client> {
    debug!(source = detect_config_source(), "Inferring Kubernetes configuration");

    let mut config = Config::infer()
        .await
        .context("no in-cluster service account or kubeconfig found")?;

    config.connect_timeout = Some(CONNECT_TIMEOUT);
    config.read_timeout = Some(READ_TIMEOUT);

    let client = Client::try_from(config).context("failed to create Kubernetes client")?;

    debug!("Kubernetes client initialized successfully");
    Ok(client)
}
