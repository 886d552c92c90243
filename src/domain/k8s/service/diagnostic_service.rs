use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::api::dto::k8s_info_dto::{Diagnostic, DiagnosticDetails, DiagnosticResponse};
use crate::core::client::cluster_client::ClusterClient;

/// Probes configuration loading and one cheap API call.
pub async fn run_k8s_diagnostic(
    cluster: &dyn ClusterClient,
    degraded: bool,
    timeout: Duration,
) -> DiagnosticResponse {
    let timestamp = Utc::now().timestamp_millis() as f64 / 1000.0;

    let mut details = DiagnosticDetails {
        config_source: cluster.config_source(),
        api_test: "skipped - no config".to_string(),
        error: None,
    };

    let (config_status, api_connectivity) = match cluster.load_config().await {
        Err(err) => {
            warn!(error = %err, "Diagnostic: configuration unavailable");
            details.error = Some(err.to_string());
            ("failed", "not tested")
        }
        Ok(()) => match cluster.list_namespaces(Some(1), timeout).await {
            Ok(_) => {
                details.api_test = "passed".to_string();
                ("loaded", "success")
            }
            Err(err) => {
                warn!(error = %err, "Diagnostic: API call failed");
                details.api_test = format!("failed: {err}");
                ("loaded", "failed")
            }
        },
    };

    debug!(config_status, api_connectivity, degraded, "Kubernetes diagnostic completed");

    DiagnosticResponse {
        status: "success".to_string(),
        diagnostic: Diagnostic {
            timestamp,
            config_status: config_status.to_string(),
            api_connectivity: api_connectivity.to_string(),
            degraded,
            details,
        },
    }
}
