//! The seam between the pod services and the cluster control plane.
//!
//! [`ClusterClient`] is what the domain layer talks to. [`KubeClusterClient`]
//! backs it with `kube`; tests substitute an in-memory implementation.

use std::time::Duration;

use async_trait::async_trait;
use kube::Client;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::core::client::kube_client::{build_kube_client, detect_config_source};
use crate::core::client::kube_resources::Pod;
use crate::core::client::{namespaces, pods};

#[derive(Debug, Clone, Error)]
pub enum ClusterError {
    /// Credentials could not be established.
    #[error("{0}")]
    Config(String),

    #[error("Kubernetes API error ({code}): {reason}: {message}")]
    Api { code: u16, reason: String, message: String },

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Transport(String),
}

impl ClusterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::Api { code: 404, .. })
    }

    /// Message shown to users when a listing fails outright.
    pub fn user_message(&self) -> String {
        match self {
            ClusterError::Config(detail) => {
                format!("unable to load cluster configuration: {detail}")
            }
            ClusterError::Api { code: 401, .. } => {
                "Unauthorized access to Kubernetes API. Please check service account permissions."
                    .to_string()
            }
            ClusterError::Api { code: 403, .. } => {
                "Forbidden access to Kubernetes API. Please check RBAC permissions.".to_string()
            }
            ClusterError::Api { code: 404, .. } => {
                "Kubernetes API server not found. Please ensure the application is running inside a Kubernetes cluster or has proper kubeconfig setup."
                    .to_string()
            }
            ClusterError::Api { code: 500, .. } => "Kubernetes API server internal error.".to_string(),
            ClusterError::Api { code, reason, .. } => {
                format!("Kubernetes API error ({code}): {reason}")
            }
            ClusterError::Timeout(after) => format!(
                "Timeout connecting to Kubernetes API server after {}s. Please check network connectivity.",
                after.as_secs()
            ),
            ClusterError::Transport(detail) => format!(
                "Unable to connect to Kubernetes API server: {detail}"
            ),
        }
    }
}

impl From<kube::Error> for ClusterError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => ClusterError::Api {
                code: resp.code,
                reason: resp.reason.clone(),
                message: resp.message.clone(),
            },
            other => ClusterError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Establishes credentials. Must be called before any other operation.
    async fn load_config(&self) -> Result<(), ClusterError>;

    async fn list_namespaced_pods(
        &self,
        namespace: &str,
        field_selector: Option<&str>,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<Pod>, ClusterError>;

    async fn list_all_pods(
        &self,
        field_selector: Option<&str>,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<Pod>, ClusterError>;

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), ClusterError>;

    async fn list_namespaces(
        &self,
        limit: Option<usize>,
        timeout: Duration,
    ) -> Result<Vec<String>, ClusterError>;

    fn config_source(&self) -> String {
        "unknown".to_string()
    }
}

/// `kube`-backed client. The underlying connection is created on first use
/// and reused afterwards; a failed attempt is retried on the next call.
#[derive(Default)]
pub struct KubeClusterClient {
    client: OnceCell<Client>,
}

impl KubeClusterClient {
    pub fn new() -> Self {
        Self::default()
    }

    async fn client(&self) -> Result<&Client, ClusterError> {
        self.client
            .get_or_try_init(|| async {
                let client = build_kube_client()
                    .await
                    .map_err(|e| ClusterError::Config(format!("{e:#}")))?;
                info!(source = detect_config_source(), "Kubernetes API client initialized");
                Ok(client)
            })
            .await
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn load_config(&self) -> Result<(), ClusterError> {
        self.client().await.map(|_| ())
    }

    async fn list_namespaced_pods(
        &self,
        namespace: &str,
        field_selector: Option<&str>,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<Pod>, ClusterError> {
        let client = self.client().await?;
        pods::fetch_pods_by_namespace(client, namespace, field_selector, limit, timeout).await
    }

    async fn list_all_pods(
        &self,
        field_selector: Option<&str>,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<Pod>, ClusterError> {
        let client = self.client().await?;
        pods::fetch_pods(client, field_selector, limit, timeout).await
    }

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), ClusterError> {
        let client = self.client().await?;
        pods::delete_pod_by_name_and_namespace(client, namespace, name).await
    }

    async fn list_namespaces(
        &self,
        limit: Option<usize>,
        timeout: Duration,
    ) -> Result<Vec<String>, ClusterError> {
        let client = self.client().await?;
        namespaces::fetch_namespace_names(client, limit, timeout).await
    }

    fn config_source(&self) -> String {
        detect_config_source().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(code: u16) -> ClusterError {
        ClusterError::Api {
            code,
            reason: "Reason".to_string(),
            message: "message".to_string(),
        }
    }

    #[test]
    fn not_found_is_detected_from_status_code() {
        assert!(api_error(404).is_not_found());
        assert!(!api_error(403).is_not_found());
        assert!(!ClusterError::Transport("boom".to_string()).is_not_found());
    }

    #[test]
    fn user_messages_distinguish_failure_classes() {
        assert!(api_error(401).user_message().starts_with("Unauthorized"));
        assert!(api_error(403).user_message().contains("RBAC"));
        assert_eq!(api_error(418).user_message(), "Kubernetes API error (418): Reason");
        assert!(ClusterError::Timeout(Duration::from_secs(20))
            .user_message()
            .contains("20s"));
        assert_eq!(
            ClusterError::Config("no kubeconfig".to_string()).user_message(),
            "unable to load cluster configuration: no kubeconfig"
        );
    }
}
