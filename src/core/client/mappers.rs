/// Maps k8s-openapi types → internal domain models
use anyhow::{anyhow, Result};

use crate::core::client::kube_resources::{Pod, Time};
use crate::domain::k8s::model::pod_record::PodRecord;

const UNKNOWN_PHASE: &str = "Unknown";

/// Converts a k8s-openapi Pod into a PodRecord.
///
/// Fails when the pod lacks a name, a namespace or a spec.
pub fn map_pod_to_record(pod: &Pod) -> Result<PodRecord> {
    let metadata = &pod.metadata;
    let name = metadata
        .name
        .clone()
        .ok_or_else(|| anyhow!("pod without metadata.name"))?;
    let namespace = metadata
        .namespace
        .clone()
        .ok_or_else(|| anyhow!("pod '{name}' without metadata.namespace"))?;
    let spec = pod
        .spec
        .as_ref()
        .ok_or_else(|| anyhow!("pod '{namespace}/{name}' without spec"))?;
    let status = pod.status.as_ref();

    let phase = status
        .and_then(|s| s.phase.clone())
        .unwrap_or_else(|| UNKNOWN_PHASE.to_string());

    let container_statuses = status
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();

    let total_containers = spec.containers.len();
    let ready_containers = container_statuses.iter().filter(|cs| cs.ready).count();
    let restart_count = container_statuses
        .iter()
        .map(|cs| u32::try_from(cs.restart_count).unwrap_or(0))
        .sum();

    let image = spec
        .containers
        .first()
        .and_then(|c| c.image.clone())
        .unwrap_or_default();

    // `name` label wins over `app`
    let app_name = metadata.labels.as_ref().and_then(|labels| {
        labels
            .get("name")
            .or_else(|| labels.get("app"))
            .cloned()
    });

    let created_timestamp = metadata
        .creation_timestamp
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_default();

    Ok(PodRecord {
        id: format!("{namespace}-{name}"),
        healthy: ready_containers == total_containers && phase == "Running",
        ready: format!("{ready_containers}/{total_containers}"),
        name,
        namespace,
        created_timestamp,
        phase,
        restart_count,
        image,
        node_name: spec.node_name.clone(),
        pod_ip: status.and_then(|s| s.pod_ip.clone()),
        host_ip: status.and_then(|s| s.host_ip.clone()),
        app_name,
    })
}

/// RFC 3339 rendering, as the API server itself serializes it.
fn format_timestamp(ts: &Time) -> String {
    serde_json::to_value(ts)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pod(value: serde_json::Value) -> Pod {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn maps_running_pod() {
        let p = pod(json!({
            "metadata": {
                "name": "web-1",
                "namespace": "default",
                "creationTimestamp": "2024-05-01T10:00:00Z",
                "labels": { "app": "web" }
            },
            "spec": {
                "nodeName": "node-a",
                "containers": [
                    { "name": "web", "image": "nginx:1.25" },
                    { "name": "sidecar", "image": "envoy:1.30" }
                ]
            },
            "status": {
                "phase": "Running",
                "podIP": "10.0.0.5",
                "hostIP": "192.168.1.10",
                "containerStatuses": [
                    { "name": "web", "ready": true, "restartCount": 2, "image": "nginx:1.25", "imageID": "" },
                    { "name": "sidecar", "ready": true, "restartCount": 1, "image": "envoy:1.30", "imageID": "" }
                ]
            }
        }));

        let record = map_pod_to_record(&p).unwrap();

        assert_eq!(record.id, "default-web-1");
        assert_eq!(record.created_timestamp, "2024-05-01T10:00:00Z");
        assert_eq!(record.phase, "Running");
        assert!(record.healthy);
        assert_eq!(record.ready, "2/2");
        assert_eq!(record.restart_count, 3);
        assert_eq!(record.image, "nginx:1.25");
        assert_eq!(record.node_name.as_deref(), Some("node-a"));
        assert_eq!(record.pod_ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(record.host_ip.as_deref(), Some("192.168.1.10"));
        assert_eq!(record.app_name.as_deref(), Some("web"));
    }

    #[test]
    fn partially_ready_pod_is_unhealthy() {
        let p = pod(json!({
            "metadata": { "name": "api", "namespace": "prod", "labels": { "name": "api-svc", "app": "api" } },
            "spec": { "containers": [ { "name": "a", "image": "a:1" }, { "name": "b", "image": "b:1" } ] },
            "status": {
                "phase": "Running",
                "containerStatuses": [
                    { "name": "a", "ready": true, "restartCount": 0, "image": "a:1", "imageID": "" },
                    { "name": "b", "ready": false, "restartCount": 4, "image": "b:1", "imageID": "" }
                ]
            }
        }));

        let record = map_pod_to_record(&p).unwrap();

        assert!(!record.healthy);
        assert_eq!(record.ready, "1/2");
        assert_eq!(record.app_name.as_deref(), Some("api-svc"));
        assert_eq!(record.created_timestamp, "");
    }

    #[test]
    fn missing_status_defaults_to_unknown_phase() {
        let p = pod(json!({
            "metadata": { "name": "bare", "namespace": "default" },
            "spec": { "containers": [] }
        }));

        let record = map_pod_to_record(&p).unwrap();

        assert_eq!(record.phase, "Unknown");
        assert!(!record.healthy);
        assert_eq!(record.ready, "0/0");
        assert_eq!(record.image, "");
        assert_eq!(record.app_name, None);
    }

    #[test]
    fn pod_without_namespace_fails_to_map() {
        let p = pod(json!({
            "metadata": { "name": "orphan" },
            "spec": { "containers": [] }
        }));
        assert!(map_pod_to_record(&p).is_err());
    }

    #[test]
    fn pod_without_spec_fails_to_map() {
        let p = pod(json!({ "metadata": { "name": "x", "namespace": "default" } }));
        assert!(map_pod_to_record(&p).is_err());
    }
}
