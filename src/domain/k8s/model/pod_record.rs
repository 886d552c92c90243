use serde::{Deserialize, Serialize};

/// Snapshot of one pod at query time. Built fresh per request, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRecord {
    /// `"{namespace}-{name}"`
    pub id: String,
    pub name: String,
    pub namespace: String,
    /// RFC 3339, empty when the cluster did not report one.
    pub created_timestamp: String,
    pub phase: String,
    pub healthy: bool,
    /// `"{ready}/{total}"` containers.
    pub ready: String,
    pub restart_count: u32,
    pub image: String,
    pub node_name: Option<String>,
    pub pod_ip: Option<String>,
    pub host_ip: Option<String>,
    pub app_name: Option<String>,
}
