//! Per client IP request limiting over fixed one-minute windows.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const CLEANUP_INTERVAL_SECONDS: i64 = 300;

#[derive(Debug, Clone)]
struct RateLimitEntry {
    request_count: u32,
    window_start: DateTime<Utc>,
}

pub struct RateLimiter {
    requests_per_minute: u32,
    limits: RwLock<HashMap<String, RateLimitEntry>>,
    last_cleanup: RwLock<DateTime<Utc>>,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            requests_per_minute,
            limits: RwLock::new(HashMap::new()),
            last_cleanup: RwLock::new(Utc::now()),
        }
    }

    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    /// Counts one request for `key`; returns false when its window is exhausted.
    pub async fn check_limit(&self, key: &str) -> bool {
        self.check_limit_at(key, Utc::now()).await
    }

    async fn check_limit_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut limits = self.limits.write().await;
        self.perform_cleanup(&mut limits, now).await;

        let entry = limits.entry(key.to_string()).or_insert_with(|| RateLimitEntry {
            request_count: 0,
            window_start: now,
        });

        if now - entry.window_start >= Duration::minutes(1) {
            entry.request_count = 0;
            entry.window_start = now;
        }

        if entry.request_count >= self.requests_per_minute {
            return false;
        }

        entry.request_count += 1;
        debug!(key, count = entry.request_count, "Rate limit check passed");
        true
    }

    /// Drops windows that expired long ago.
    async fn perform_cleanup(&self, limits: &mut HashMap<String, RateLimitEntry>, now: DateTime<Utc>) {
        let mut last_cleanup = self.last_cleanup.write().await;
        if now - *last_cleanup < Duration::seconds(CLEANUP_INTERVAL_SECONDS) {
            return;
        }

        let before = limits.len();
        limits.retain(|_, entry| now - entry.window_start < Duration::minutes(1));
        let removed = before - limits.len();
        if removed > 0 {
            debug!(removed, "Cleaned up expired rate limit entries");
        }
        *last_cleanup = now;
    }
}

/// Middleware rejecting clients that exceeded their per-minute budget.
pub async fn rate_limit(State(limiter): State<Arc<RateLimiter>>, req: Request, next: Next) -> Response {
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if limiter.check_limit(&client_ip).await {
        return next.run(req).await;
    }

    let limit = format!("{} requests per minute", limiter.requests_per_minute());
    warn!(client_ip = %client_ip, endpoint = %req.uri().path(), limit = %limit, "Rate limit exceeded");

    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({
            "error": "Rate limit exceeded",
            "message": "Too many requests. Please try again later.",
            "limit": limit,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn requests_beyond_budget_are_rejected_until_window_resets() {
        let limiter = RateLimiter::new(3);
        let start = Utc::now();

        for _ in 0..3 {
            assert!(limiter.check_limit_at("10.0.0.1", start).await);
        }
        assert!(!limiter.check_limit_at("10.0.0.1", start + Duration::seconds(30)).await);
        assert!(limiter.check_limit_at("10.0.0.2", start + Duration::seconds(30)).await);
        assert!(limiter.check_limit_at("10.0.0.1", start + Duration::seconds(61)).await);
    }

    #[tokio::test]
    async fn cleanup_drops_expired_windows() {
        let limiter = RateLimiter::new(1);
        let start = Utc::now();
        limiter.check_limit_at("a", start).await;

        limiter
            .check_limit_at("b", start + Duration::seconds(CLEANUP_INTERVAL_SECONDS + 1))
            .await;

        let limits = limiter.limits.read().await;
        assert!(!limits.contains_key("a"));
        assert!(limits.contains_key("b"));
    }

    #[tokio::test]
    async fn middleware_answers_429_with_json_body() {
        let limiter = Arc::new(RateLimiter::new(1));
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(limiter, rate_limit));

        let first = app
            .clone()
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        let bytes = axum::body::to_bytes(second.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Rate limit exceeded");
        assert_eq!(body["limit"], "1 requests per minute");
    }
}
