use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api::dto::system_dto::{HealthCheck, ReadyResponse, ServiceStatus};

/// Health report together with the HTTP status the endpoint should answer with.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub http_status: u16,
    pub body: HealthCheck,
}

/// Checks the backend (always up when this runs) and the frontend URL.
pub async fn check_health(client: &Client, frontend_url: &str, timeout: Duration) -> HealthReport {
    let started = Instant::now();
    let backend = ServiceStatus::healthy("Backend service is running");
    let frontend = check_frontend(client, frontend_url, timeout).await;

    let failing = [&frontend, &backend].into_iter().find(|s| !s.is_healthy());
    let (status, http_status) = match failing {
        Some(service) => ("unhealthy", service.status_code.parse::<u16>().unwrap_or(500)),
        None => ("healthy", 200),
    };

    info!(
        status,
        frontend_status = %frontend.status,
        total_time_ms = started.elapsed().as_millis() as u64,
        "Health check completed"
    );

    HealthReport {
        http_status,
        body: HealthCheck {
            status: status.to_string(),
            backend,
            frontend,
        },
    }
}

async fn check_frontend(client: &Client, url: &str, timeout: Duration) -> ServiceStatus {
    let started = Instant::now();
    match client.get(url).timeout(timeout).send().await {
        Ok(response) if response.status().as_u16() == 200 => {
            debug!(check_time_ms = started.elapsed().as_millis() as u64, "Frontend is healthy");
            ServiceStatus::healthy("Frontend service is running")
        }
        Ok(response) => {
            let code = response.status().as_u16();
            warn!(status_code = code, expected_status = 200, "Frontend health check failed");
            ServiceStatus::unhealthy(format!("Frontend service returned status code: {code}"), code)
        }
        Err(err) if err.is_timeout() => {
            warn!(timeout_seconds = timeout.as_secs(), "Frontend health check timeout");
            ServiceStatus::unhealthy(
                format!("Frontend service timeout after {} seconds", timeout.as_secs()),
                503,
            )
        }
        Err(err) => {
            warn!(error = %err, "Frontend health check connection error");
            ServiceStatus::unhealthy(format!("Frontend service connection error: {err}"), 408)
        }
    }
}

pub fn readiness() -> ReadyResponse {
    ReadyResponse {
        status: "ready".to_string(),
        message: "Backend service is ready".to_string(),
        timestamp: None,
    }
}

pub fn backend_readiness() -> ReadyResponse {
    ReadyResponse {
        timestamp: Some(Utc::now().timestamp_millis() as f64 / 1000.0),
        ..readiness()
    }
}
