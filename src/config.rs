//! Runtime configuration read from the process environment.
//!
//! Every setting is optional. A `.env` file next to the binary is loaded by
//! `main` through `dotenvy` before [`AppConfig::from_env`] runs.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

use crate::domain::k8s::model::pod_query::DEFAULT_POD_CAP_LIMIT;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,

    /// Upper bound on pods fetched or counted by one listing.
    pub pod_cap_limit: usize,
    pub namespaced_list_timeout: Duration,
    pub all_namespaces_list_timeout: Duration,
    pub namespace_fetch_concurrency: usize,
    pub request_timeout: Duration,
    pub slow_request_threshold: Duration,
    pub degraded_window: Duration,

    pub frontend_url: String,
    pub frontend_timeout: Duration,
    pub http_request_timeout: Duration,
    pub network_check_timeout: Duration,

    pub rate_limit_per_minute: u32,
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            pod_cap_limit: DEFAULT_POD_CAP_LIMIT,
            namespaced_list_timeout: Duration::from_secs(15),
            all_namespaces_list_timeout: Duration::from_secs(20),
            namespace_fetch_concurrency: 4,
            request_timeout: Duration::from_secs(45),
            slow_request_threshold: Duration::from_millis(5000),
            degraded_window: Duration::from_secs(30),
            frontend_url: "http://localhost:3000".to_string(),
            frontend_timeout: Duration::from_secs(2),
            http_request_timeout: Duration::from_secs(10),
            network_check_timeout: Duration::from_secs(5),
            rate_limit_per_minute: 60,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to
    /// [`AppConfig::default`] for keys that are absent or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            host: get("DALLAS_HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "DALLAS_PORT", defaults.port)?,
            log_level: get("LOG_LEVEL")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or(defaults.log_level),
            pod_cap_limit: parse_or(&get, "DALLAS_POD_CAP_LIMIT", defaults.pod_cap_limit)?,
            namespaced_list_timeout: secs_or(
                &get,
                "DALLAS_NAMESPACED_LIST_TIMEOUT_SECS",
                defaults.namespaced_list_timeout,
            )?,
            all_namespaces_list_timeout: secs_or(
                &get,
                "DALLAS_ALL_NAMESPACES_LIST_TIMEOUT_SECS",
                defaults.all_namespaces_list_timeout,
            )?,
            namespace_fetch_concurrency: parse_or(
                &get,
                "DALLAS_NAMESPACE_FETCH_CONCURRENCY",
                defaults.namespace_fetch_concurrency,
            )?,
            request_timeout: secs_or(&get, "DALLAS_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            slow_request_threshold: parse_or(&get, "DALLAS_SLOW_REQUEST_THRESHOLD_MS", 5000u64)
                .map(Duration::from_millis)?,
            degraded_window: secs_or(&get, "DALLAS_DEGRADED_WINDOW_SECS", defaults.degraded_window)?,
            frontend_url: get("DALLAS_FRONTEND_URL").unwrap_or(defaults.frontend_url),
            frontend_timeout: secs_or(&get, "DALLAS_FRONTEND_TIMEOUT_SECS", defaults.frontend_timeout)?,
            http_request_timeout: secs_or(
                &get,
                "DALLAS_HTTP_REQUEST_TIMEOUT_SECS",
                defaults.http_request_timeout,
            )?,
            network_check_timeout: secs_or(
                &get,
                "DALLAS_NETWORK_CHECK_TIMEOUT_SECS",
                defaults.network_check_timeout,
            )?,
            rate_limit_per_minute: parse_or(
                &get,
                "DALLAS_RATE_LIMIT_PER_MINUTE",
                defaults.rate_limit_per_minute,
            )?,
            cors_origins: get("DALLAS_CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.pod_cap_limit == 0 {
            bail!("DALLAS_POD_CAP_LIMIT must be greater than zero");
        }
        if self.namespace_fetch_concurrency == 0 {
            bail!("DALLAS_NAMESPACE_FETCH_CONCURRENCY must be greater than zero");
        }
        if self.rate_limit_per_minute == 0 {
            bail!("DALLAS_RATE_LIMIT_PER_MINUTE must be greater than zero");
        }
        // Credentialed CORS cannot answer with a wildcard origin.
        if self.cors_origins.iter().any(|origin| origin == "*") {
            bail!("DALLAS_CORS_ORIGINS must list explicit origins; '*' is not allowed");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid value '{raw}' for {key}")),
        None => Ok(default),
    }
}

fn secs_or<G>(get: &G, key: &str, default: Duration) -> Result<Duration>
where
    G: Fn(&str) -> Option<String>,
{
    parse_or(get, key, default.as_secs()).map(Duration::from_secs)
}
