//! Namespace and diagnostic DTOs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceListResponse {
    pub namespaces: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticResponse {
    pub status: String,
    pub diagnostic: Diagnostic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    /// `loaded` | `failed`
    pub config_status: String,
    /// `success` | `failed` | `not tested`
    pub api_connectivity: String,
    pub degraded: bool,
    pub details: DiagnosticDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticDetails {
    pub config_source: String,
    pub api_test: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
