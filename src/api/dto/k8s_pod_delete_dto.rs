use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeletePodRequest {
    #[validate(length(min = 1, max = 253))]
    pub name: String,
    #[validate(length(min = 1, max = 253))]
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePodResponse {
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

impl DeletePodResponse {
    pub fn deleted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: "Failed to delete pod".to_string(),
            error: Some(error.into()),
        }
    }
}
