//! Pod listing query string

use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};

use crate::domain::k8s::model::pod_query::{
    parse_filter_list, PodQuery, SortField, SortOrder, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};

#[serde_as]
#[derive(Deserialize, Debug, Default)]
pub struct K8sPodQueryRequestDto {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,

    /// Comma separated namespaces, fetched in the given order.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub namespace_filter: Option<String>,

    /// Comma separated pod phases.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub status_filter: Option<String>,
}

impl K8sPodQueryRequestDto {
    /// Applies defaults; clamping to the cap happens in the engine.
    pub fn into_pod_query(self) -> PodQuery {
        PodQuery {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            sort_by: self.sort_by.as_deref().map(SortField::parse).unwrap_or_default(),
            sort_order: self.sort_order.as_deref().map(SortOrder::parse).unwrap_or_default(),
            namespace_filter: parse_filter_list(self.namespace_filter.as_deref()),
            status_filter: parse_filter_list(self.status_filter.as_deref()),
        }
    }
}
