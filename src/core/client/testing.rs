//! In-memory `ClusterClient` used by unit tests across the crate.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::core::client::cluster_client::{ClusterClient, ClusterError};
use crate::core::client::kube_resources::Pod;

#[derive(Default)]
pub struct FakeCluster {
    pub config_error: Option<String>,
    pub pods: Vec<Pod>,
    pub failing_namespaces: HashSet<String>,
    /// Namespaced lists for these namespaces complete only after the delay.
    pub namespace_delays: HashMap<String, Duration>,
    pub all_pods_error: Option<ClusterError>,
    pub delete_error: Option<ClusterError>,
    pub namespaces_error: Option<ClusterError>,
    /// One entry per list call, e.g. `"ns=default selector=None limit=100"`.
    pub calls: Mutex<Vec<String>>,
}

impl FakeCluster {
    pub fn with_pods(pods: Vec<Pod>) -> Self {
        Self {
            pods,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn matching<'a>(
        &'a self,
        namespace: Option<&'a str>,
        field_selector: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Pod> + 'a {
        let phase = field_selector.and_then(|s| s.strip_prefix("status.phase="));
        self.pods.iter().filter(move |p| {
            let ns_ok = namespace.is_none_or(|ns| p.metadata.namespace.as_deref() == Some(ns));
            let phase_ok = phase.is_none_or(|want| {
                p.status.as_ref().and_then(|s| s.phase.as_deref()) == Some(want)
            });
            ns_ok && phase_ok
        })
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn load_config(&self) -> Result<(), ClusterError> {
        match &self.config_error {
            Some(detail) => Err(ClusterError::Config(detail.clone())),
            None => Ok(()),
        }
    }

    async fn list_namespaced_pods(
        &self,
        namespace: &str,
        field_selector: Option<&str>,
        limit: usize,
        _timeout: Duration,
    ) -> Result<Vec<Pod>, ClusterError> {
        self.record(format!("ns={namespace} selector={field_selector:?} limit={limit}"));
        if let Some(delay) = self.namespace_delays.get(namespace) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_namespaces.contains(namespace) {
            return Err(api_error(403, "Forbidden"));
        }
        Ok(self
            .matching(Some(namespace), field_selector)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_all_pods(
        &self,
        field_selector: Option<&str>,
        limit: usize,
        _timeout: Duration,
    ) -> Result<Vec<Pod>, ClusterError> {
        self.record(format!("all selector={field_selector:?} limit={limit}"));
        if let Some(err) = &self.all_pods_error {
            return Err(err.clone());
        }
        Ok(self.matching(None, field_selector).take(limit).cloned().collect())
    }

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), ClusterError> {
        if let Some(err) = &self.delete_error {
            return Err(err.clone());
        }
        let exists = self.pods.iter().any(|p| {
            p.metadata.name.as_deref() == Some(name)
                && p.metadata.namespace.as_deref() == Some(namespace)
        });
        if exists {
            Ok(())
        } else {
            Err(api_error(404, "NotFound"))
        }
    }

    async fn list_namespaces(
        &self,
        limit: Option<usize>,
        _timeout: Duration,
    ) -> Result<Vec<String>, ClusterError> {
        if let Some(err) = &self.namespaces_error {
            return Err(err.clone());
        }
        let mut seen: Vec<String> = Vec::new();
        for ns in self.pods.iter().filter_map(|p| p.metadata.namespace.clone()) {
            if !seen.contains(&ns) {
                seen.push(ns);
            }
        }
        seen.truncate(limit.unwrap_or(usize::MAX));
        Ok(seen)
    }

    fn config_source(&self) -> String {
        "fake".to_string()
    }
}

pub fn api_error(code: u16, reason: &str) -> ClusterError {
    ClusterError::Api {
        code,
        reason: reason.to_string(),
        message: format!("{reason} ({code})"),
    }
}

pub fn pod(name: &str, namespace: &str, phase: &str) -> Pod {
    pod_with(name, namespace, phase, 0, "2024-01-01T00:00:00Z")
}

pub fn pod_with(name: &str, namespace: &str, phase: &str, restarts: i32, created: &str) -> Pod {
    serde_json::from_value(json!({
        "metadata": {
            "name": name,
            "namespace": namespace,
            "creationTimestamp": created,
            "labels": { "app": name }
        },
        "spec": {
            "containers": [ { "name": "main", "image": "busybox:1.36" } ]
        },
        "status": {
            "phase": phase,
            "containerStatuses": [
                {
                    "name": "main",
                    "ready": phase == "Running",
                    "restartCount": restarts,
                    "image": "busybox:1.36",
                    "imageID": ""
                }
            ]
        }
    }))
    .unwrap()
}
