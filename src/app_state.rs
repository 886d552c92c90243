use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::api::dto::k8s_info_dto::{DiagnosticResponse, NamespaceListResponse};
use crate::api::dto::k8s_pod_delete_dto::DeletePodResponse;
use crate::api::dto::network_dto::{CommandResponse, HttpRequestDto, HttpResponseDto};
use crate::api::middleware::rate_limit::RateLimiter;
use crate::config::AppConfig;
use crate::core::client::cluster_client::{ClusterClient, KubeClusterClient};
use crate::domain::k8s::model::pod_page::PodPage;
use crate::domain::k8s::model::pod_query::PodQuery;
use crate::domain::k8s::service::latency_observer::SlowRequestTracker;
use crate::domain::k8s::service::pod_query_engine::{PodQueryEngine, PodQuerySettings};
use crate::domain::k8s::service::{diagnostic_service, namespace_service, pod_delete_service};
use crate::domain::network::service::{http_request_service, network_check_service};
use crate::domain::system::service::health_service::{self, HealthReport};

#[derive(Clone)]
pub struct AppState {
    pub k8s_service: Arc<K8sService>,
    pub network_service: Arc<NetworkService>,
    pub system_service: Arc<SystemService>,
    pub rate_limiter: Arc<RateLimiter>,
}

pub fn build_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    build_app_state_with_cluster(config, Arc::new(KubeClusterClient::new()))
}

pub fn build_app_state_with_cluster(
    config: &AppConfig,
    cluster: Arc<dyn ClusterClient>,
) -> anyhow::Result<AppState> {
    let http_client = reqwest::Client::builder()
        .redirect(http_request_service::redirect_policy())
        .build()
        .context("failed to build outbound HTTP client")?;

    Ok(AppState {
        k8s_service: Arc::new(K8sService::new(config, cluster)),
        network_service: Arc::new(NetworkService {
            http_client: http_client.clone(),
            http_request_timeout: config.http_request_timeout,
            network_check_timeout: config.network_check_timeout,
        }),
        system_service: Arc::new(SystemService {
            http_client,
            frontend_url: config.frontend_url.clone(),
            frontend_timeout: config.frontend_timeout,
        }),
        rate_limiter: Arc::new(RateLimiter::new(config.rate_limit_per_minute)),
    })
}

pub struct K8sService {
    cluster: Arc<dyn ClusterClient>,
    engine: PodQueryEngine,
    slow_tracker: Arc<SlowRequestTracker>,
    list_timeout: Duration,
}

impl K8sService {
    pub fn new(config: &AppConfig, cluster: Arc<dyn ClusterClient>) -> Self {
        let slow_tracker = Arc::new(SlowRequestTracker::new(
            config.slow_request_threshold,
            config.degraded_window,
        ));
        let engine = PodQueryEngine::new(cluster.clone(), PodQuerySettings::from(config))
            .with_observer(slow_tracker.clone());
        Self {
            cluster,
            engine,
            slow_tracker,
            list_timeout: config.namespaced_list_timeout,
        }
    }

    pub async fn list_pods(&self, query: PodQuery) -> PodPage {
        self.engine.list_pods(query).await
    }

    pub async fn delete_pod(&self, name: &str, namespace: &str) -> DeletePodResponse {
        pod_delete_service::delete_pod(self.cluster.as_ref(), name, namespace).await
    }

    pub async fn get_k8s_namespaces(&self) -> NamespaceListResponse {
        namespace_service::get_k8s_namespaces(self.cluster.as_ref(), self.list_timeout).await
    }

    pub async fn run_k8s_diagnostic(&self) -> DiagnosticResponse {
        diagnostic_service::run_k8s_diagnostic(
            self.cluster.as_ref(),
            self.slow_tracker.is_degraded(),
            self.list_timeout,
        )
        .await
    }
}

pub struct NetworkService {
    http_client: reqwest::Client,
    http_request_timeout: Duration,
    network_check_timeout: Duration,
}

impl NetworkService {
    pub async fn check_network(&self, host: &str, port: u16) -> CommandResponse {
        network_check_service::check_tcp_connectivity(host, port, self.network_check_timeout).await
    }

    pub async fn make_http_request(&self, request: &HttpRequestDto) -> HttpResponseDto {
        http_request_service::send_http_request(&self.http_client, request, self.http_request_timeout)
            .await
    }
}

pub struct SystemService {
    http_client: reqwest::Client,
    frontend_url: String,
    frontend_timeout: Duration,
}

impl SystemService {
    pub async fn health(&self) -> HealthReport {
        health_service::check_health(&self.http_client, &self.frontend_url, self.frontend_timeout)
            .await
    }
}
