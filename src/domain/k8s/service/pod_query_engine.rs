//! Server-side pod listing: capped fetch, phase filter, sort and paginate.
//!
//! Everything after the fetch happens in memory on the records of a single
//! request. The engine never returns an error: failures are reported through
//! [`PodPage::error`] so the HTTP layer can serialize the result as-is.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::api::dto::paginated_response::{page_bounds, PaginationInfo};
use crate::config::AppConfig;
use crate::core::client::cluster_client::ClusterClient;
use crate::core::client::kube_resources::Pod;
use crate::core::client::mappers::map_pod_to_record;
use crate::domain::k8s::model::pod_page::PodPage;
use crate::domain::k8s::model::pod_query::{PodQuery, SortField, SortOrder, DEFAULT_POD_CAP_LIMIT};
use crate::domain::k8s::model::pod_record::PodRecord;
use crate::domain::k8s::service::latency_observer::{LatencyObserver, NoopLatencyObserver};

#[derive(Debug, Clone)]
pub struct PodQuerySettings {
    pub cap_limit: usize,
    pub namespaced_timeout: Duration,
    pub all_namespaces_timeout: Duration,
    pub namespace_concurrency: usize,
}

impl Default for PodQuerySettings {
    fn default() -> Self {
        Self {
            cap_limit: DEFAULT_POD_CAP_LIMIT,
            namespaced_timeout: Duration::from_secs(15),
            all_namespaces_timeout: Duration::from_secs(20),
            namespace_concurrency: 4,
        }
    }
}

impl From<&AppConfig> for PodQuerySettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            cap_limit: config.pod_cap_limit,
            namespaced_timeout: config.namespaced_list_timeout,
            all_namespaces_timeout: config.all_namespaces_list_timeout,
            namespace_concurrency: config.namespace_fetch_concurrency,
        }
    }
}

struct FetchOutcome {
    pods: Vec<Pod>,
    max_limit_reached: bool,
}

pub struct PodQueryEngine {
    cluster: Arc<dyn ClusterClient>,
    observer: Arc<dyn LatencyObserver>,
    settings: PodQuerySettings,
}

impl PodQueryEngine {
    pub fn new(cluster: Arc<dyn ClusterClient>, settings: PodQuerySettings) -> Self {
        Self {
            cluster,
            observer: Arc::new(NoopLatencyObserver),
            settings,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LatencyObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub async fn list_pods(&self, query: PodQuery) -> PodPage {
        let started = Instant::now();
        let cap = self.settings.cap_limit.max(1);
        let query = query.normalized(cap);

        debug!(
            page = query.page,
            page_size = query.page_size,
            namespaces = ?query.namespace_filter,
            statuses = ?query.status_filter,
            "Listing pods"
        );

        if let Err(err) = self.cluster.load_config().await {
            let message = format!("unable to load cluster configuration: {err}");
            error!(error = %err, "Kubernetes configuration unavailable");
            return PodPage::failure(message);
        }

        let field_selector = query.field_selector();
        if let Some(selector) = &field_selector {
            debug!(field_selector = %selector, "Using field selector");
        }

        let fetch_started = Instant::now();
        let fetched = match query.namespace_filter.as_deref() {
            Some(namespaces) => {
                self.fetch_from_namespaces(namespaces, field_selector.as_deref(), &query, cap)
                    .await
            }
            None => self.fetch_from_all_namespaces(field_selector.as_deref(), &query, cap).await,
        };
        let api_time = fetch_started.elapsed();
        self.observer.observe("list_pods", api_time);

        let FetchOutcome {
            pods,
            max_limit_reached,
        } = match fetched {
            Ok(outcome) => outcome,
            Err(message) => {
                error!(
                    error = %message,
                    total_time_ms = started.elapsed().as_millis() as u64,
                    "Failed to list Kubernetes pods"
                );
                return PodPage::failure(message);
            }
        };

        debug!(
            api_time_ms = api_time.as_millis() as u64,
            pods_returned = pods.len(),
            max_limit_reached,
            "Kubernetes API call completed"
        );

        let mut records: Vec<PodRecord> = pods
            .iter()
            .filter_map(|pod| match map_pod_to_record(pod) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(error = %e, "Skipping pod that could not be mapped");
                    None
                }
            })
            .filter(|record| query.matches_status(record))
            .collect();

        sort_records(&mut records, query.sort_by, query.sort_order);

        // Once capped, the real total is unknown; report the cap as a floor.
        let total_items = if max_limit_reached { cap } else { records.len() };
        let (start, end) = page_bounds(query.page, query.page_size, records.len());
        let page_pods: Vec<PodRecord> = records.drain(start..end).collect();
        let pagination =
            PaginationInfo::compute(query.page, query.page_size, total_items, max_limit_reached);

        info!(
            pod_count = page_pods.len(),
            total_pods = pagination.total_items,
            page = pagination.page,
            page_size = pagination.page_size,
            total_pages = pagination.total_pages,
            has_next = pagination.has_next,
            max_limit_reached,
            api_time_ms = api_time.as_millis() as u64,
            total_time_ms = started.elapsed().as_millis() as u64,
            "Retrieved Kubernetes pods"
        );

        PodPage::success(page_pods, pagination)
    }

    /// Namespaces are consumed in request order, so the cap check stops at
    /// the same namespace regardless of how many fetches are in flight.
    async fn fetch_from_namespaces(
        &self,
        namespaces: &[String],
        field_selector: Option<&str>,
        query: &PodQuery,
        cap: usize,
    ) -> Result<FetchOutcome, String> {
        let limit = query.fetch_limit();
        let timeout = self.settings.namespaced_timeout;
        let selector = field_selector.map(str::to_string);

        let mut results = stream::iter(namespaces.to_vec())
            .map(|namespace: String| {
                let cluster = self.cluster.clone();
                let selector = selector.clone();
                async move {
                    let result = cluster
                        .list_namespaced_pods(&namespace, selector.as_deref(), limit, timeout)
                        .await;
                    (namespace, result)
                }
            })
            .buffered(self.settings.namespace_concurrency.max(1));

        let mut pods = Vec::new();
        let mut failures = Vec::new();
        let mut succeeded = 0usize;
        let mut max_limit_reached = false;

        while let Some((namespace, result)) = results.next().await {
            match result {
                Ok(items) => {
                    succeeded += 1;
                    pods.extend(items);
                    if pods.len() >= cap {
                        max_limit_reached = true;
                        warn!(total_pods = pods.len(), cap, "Max limit of {cap} pods reached");
                        break;
                    }
                }
                Err(e) => {
                    warn!(namespace = %namespace, error = %e, "Failed to fetch pods from namespace");
                    failures.push(format!("{namespace}: {e}"));
                }
            }
        }

        if succeeded == 0 && !failures.is_empty() {
            return Err(format!(
                "Failed to fetch pods from all requested namespaces: {}",
                failures.join("; ")
            ));
        }

        Ok(FetchOutcome {
            pods,
            max_limit_reached,
        })
    }

    async fn fetch_from_all_namespaces(
        &self,
        field_selector: Option<&str>,
        query: &PodQuery,
        cap: usize,
    ) -> Result<FetchOutcome, String> {
        let limit = query.fetch_limit().min(cap);

        let pods = self
            .cluster
            .list_all_pods(field_selector, limit, self.settings.all_namespaces_timeout)
            .await
            .map_err(|e| e.user_message())?;

        // A full batch means the listing was truncated and more pods exist.
        // The total is then reported as the cap, so trailing pages past the
        // fetched batch come back empty while `has_next` stays true.
        let max_limit_reached = pods.len() >= cap || pods.len() >= limit;
        if max_limit_reached {
            warn!(total_pods = pods.len(), cap, "Max limit of {cap} pods reached");
        }

        Ok(FetchOutcome {
            pods,
            max_limit_reached,
        })
    }
}

/// Stable: records with equal keys keep their fetch order in both directions.
pub fn sort_records(records: &mut [PodRecord], field: SortField, order: SortOrder) {
    match order {
        SortOrder::Asc => records.sort_by(|a, b| field.compare(a, b)),
        SortOrder::Desc => records.sort_by(|a, b| field.compare(b, a)),
    }
}
