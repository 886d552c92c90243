//! System API DTOs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub message: String,
    pub status_code: String,
}

impl ServiceStatus {
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            message: message.into(),
            status_code: "200".to_string(),
        }
    }

    pub fn unhealthy(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            status: "unhealthy".to_string(),
            message: message.into(),
            status_code: status_code.to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub backend: ServiceStatus,
    pub frontend: ServiceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}
