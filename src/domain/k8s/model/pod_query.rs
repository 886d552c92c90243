//! Input parameters for one pod listing.

use std::cmp::Ordering;

use crate::domain::k8s::model::pod_record::PodRecord;

/// Maximum number of pods fetched or counted by a single listing.
pub const DEFAULT_POD_CAP_LIMIT: usize = 1000;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Multiplier applied to the page size to size each cluster list call.
pub const FETCH_LIMIT_MULTIPLIER: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Namespace,
    Phase,
    CreatedTimestamp,
    RestartCount,
}

impl SortField {
    /// Unrecognized input sorts by name.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "name" => SortField::Name,
            "namespace" => SortField::Namespace,
            "phase" => SortField::Phase,
            "created_timestamp" | "createdTimestamp" => SortField::CreatedTimestamp,
            "restart_count" | "restartCount" => SortField::RestartCount,
            _ => SortField::Name,
        }
    }

    pub fn compare(self, a: &PodRecord, b: &PodRecord) -> Ordering {
        match self {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Namespace => a.namespace.cmp(&b.namespace),
            SortField::Phase => a.phase.cmp(&b.phase),
            SortField::CreatedTimestamp => a.created_timestamp.cmp(&b.created_timestamp),
            SortField::RestartCount => a.restart_count.cmp(&b.restart_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than `desc` (case-insensitive) is ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodQuery {
    pub page: usize,
    pub page_size: usize,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// `None` or a non-empty list of trimmed, distinct namespaces in request order.
    pub namespace_filter: Option<Vec<String>>,
    /// `None` or a non-empty list of trimmed, distinct phases in request order.
    pub status_filter: Option<Vec<String>>,
}

impl Default for PodQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::Name,
            sort_order: SortOrder::Asc,
            namespace_filter: None,
            status_filter: None,
        }
    }
}

impl PodQuery {
    /// Clamps `page` to at least 1 and `page_size` into `[1, cap_limit]`.
    pub fn normalized(mut self, cap_limit: usize) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, cap_limit.max(1));
        self
    }

    /// Server-side selector, only expressible for a single phase.
    pub fn field_selector(&self) -> Option<String> {
        match self.status_filter.as_deref() {
            Some([phase]) => Some(format!("status.phase={phase}")),
            _ => None,
        }
    }

    pub fn matches_status(&self, record: &PodRecord) -> bool {
        match &self.status_filter {
            Some(phases) => phases.iter().any(|p| *p == record.phase),
            None => true,
        }
    }

    pub fn fetch_limit(&self) -> usize {
        self.page_size.saturating_mul(FETCH_LIMIT_MULTIPLIER)
    }
}

/// Splits a comma separated filter into trimmed, non-blank, distinct values.
/// Returns `None` when nothing usable remains.
pub fn parse_filter_list(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?;
    let mut values: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if !part.is_empty() && !values.iter().any(|v| v == part) {
            values.push(part.to_string());
        }
    }

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
