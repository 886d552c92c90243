use serde::{Deserialize, Serialize};

use crate::api::dto::paginated_response::PaginationInfo;
use crate::domain::k8s::model::pod_record::PodRecord;

/// One page of pods. Either `pagination` is set (success) or `error` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodPage {
    pub pods: Vec<PodRecord>,
    pub pagination: Option<PaginationInfo>,
    pub error: Option<String>,
    /// Mirrors `pagination.max_limit_reached` for clients that read it top-level.
    #[serde(default)]
    pub max_limit_reached: bool,
}

impl PodPage {
    pub fn success(pods: Vec<PodRecord>, pagination: PaginationInfo) -> Self {
        let max_limit_reached = pagination.max_limit_reached;
        Self {
            pods,
            pagination: Some(pagination),
            error: None,
            max_limit_reached,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            pods: Vec::new(),
            pagination: None,
            error: Some(error.into()),
            max_limit_reached: false,
        }
    }
}
