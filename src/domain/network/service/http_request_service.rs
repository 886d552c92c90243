//! One-shot outbound HTTP request on behalf of the dashboard.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Url};
use tracing::{error, info, warn};

use crate::api::dto::network_dto::{HttpRequestDto, HttpResponseDto};

/// Hosts of cloud instance metadata services.
const IMDS_HOSTS: [&str; 3] = ["169.254.169.254", "[fd00:ec2::254]", "metadata.google.internal"];

pub const IMDS_BLOCKED_MESSAGE: &str =
    "Access to Instance Metadata Service (IMDS) endpoints is not allowed";

pub fn is_imds_endpoint(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|host| IMDS_HOSTS.iter().any(|blocked| host.eq_ignore_ascii_case(blocked)))
}

const MAX_REDIRECTS: usize = 10;

#[derive(Debug)]
struct ImdsRedirectBlocked;

impl fmt::Display for ImdsRedirectBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(IMDS_BLOCKED_MESSAGE)
    }
}

impl StdError for ImdsRedirectBlocked {}

/// Redirect policy for the outbound client: every hop is checked against the
/// metadata hosts, not just the URL the caller asked for.
pub fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if is_imds_endpoint(attempt.url()) {
            warn!(url = %attempt.url(), "IMDS redirect blocked");
            attempt.error(ImdsRedirectBlocked)
        } else if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

fn redirected_to_imds(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        if inner.is::<ImdsRedirectBlocked>() {
            return true;
        }
        source = inner.source();
    }
    false
}

/// Sends a validated request. Failures are reported in the response body with
/// `status_code` 0, never as an `Err`.
pub async fn send_http_request(client: &Client, request: &HttpRequestDto, timeout: Duration) -> HttpResponseDto {
    let started = Instant::now();
    let method = request.normalized_method();

    let url = match Url::parse(&request.url) {
        Ok(url) => url,
        Err(err) => return HttpResponseDto::failed(0, format!("Request failed: {err}")),
    };

    if is_imds_endpoint(&url) {
        warn!(url = %url, method, "IMDS access blocked");
        return HttpResponseDto::failed(403, IMDS_BLOCKED_MESSAGE);
    }

    let headers = match build_headers(request.headers.as_ref()) {
        Ok(headers) => headers,
        Err(detail) => return HttpResponseDto::failed(0, format!("Request failed: {detail}")),
    };

    let method_value = match Method::from_bytes(method.as_bytes()) {
        Ok(m) => m,
        Err(err) => return HttpResponseDto::failed(0, format!("Request failed: {err}")),
    };

    let result = client
        .request(method_value, url.clone())
        .headers(headers)
        .timeout(timeout)
        .send()
        .await;

    let response = match result {
        Ok(response) => response,
        Err(err) => return transport_failure(&url, &method, err, timeout, started),
    };

    let status_code = response.status().as_u16();
    let response_headers: BTreeMap<String, String> = response
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();

    match response.text().await {
        Ok(body) => {
            info!(
                url = %url,
                method,
                status_code,
                body_length = body.len(),
                total_time_ms = started.elapsed().as_millis() as u64,
                "HTTP request completed"
            );
            HttpResponseDto {
                status_code,
                headers: response_headers,
                body,
                error: None,
            }
        }
        Err(err) => transport_failure(&url, &method, err, timeout, started),
    }
}

fn build_headers(raw: Option<&BTreeMap<String, String>>) -> Result<HeaderMap, String> {
    let mut headers = HeaderMap::new();
    for (name, value) in raw.into_iter().flatten() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| format!("invalid header name '{name}': {e}"))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| format!("invalid value for header '{name}': {e}"))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn transport_failure(
    url: &Url,
    method: &str,
    err: reqwest::Error,
    timeout: Duration,
    started: Instant,
) -> HttpResponseDto {
    if redirected_to_imds(&err) {
        return HttpResponseDto::failed(403, IMDS_BLOCKED_MESSAGE);
    }
    let message = if err.is_timeout() {
        format!("Request failed: timed out after {}s", timeout.as_secs())
    } else {
        format!("Connection error: {err}")
    };
    error!(
        url = %url,
        method,
        total_time_ms = started.elapsed().as_millis() as u64,
        error = %message,
        "HTTP request failed"
    );
    HttpResponseDto::failed(0, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::Redirect;
    use axum::{routing::get, Router};
    use tokio::net::TcpListener;

    fn request(url: &str) -> HttpRequestDto {
        HttpRequestDto {
            url: url.to_string(),
            method: "get".to_string(),
            headers: None,
            body: None,
        }
    }

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/hello", get(|| async { ([("x-served-by", "test")], "hi there") }))
            .route("/hop", get(|| async { Redirect::temporary("/hello") }))
            .route(
                "/go",
                get(|| async { Redirect::temporary("http://169.254.169.254/latest/meta-data/") }),
            );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn metadata_hosts_are_recognised() {
        for url in [
            "http://169.254.169.254/latest/meta-data/",
            "https://169.254.169.254/",
            "http://[fd00:ec2::254]/latest",
            "http://METADATA.google.internal/computeMetadata/v1/",
        ] {
            assert!(is_imds_endpoint(&Url::parse(url).unwrap()), "{url}");
        }
        assert!(!is_imds_endpoint(&Url::parse("http://169.254.169.253/").unwrap()));
        assert!(!is_imds_endpoint(&Url::parse("http://example.com/169.254.169.254").unwrap()));
    }

    #[tokio::test]
    async fn metadata_requests_are_refused_without_network() {
        let client = Client::new();

        let response = send_http_request(
            &client,
            &request("http://169.254.169.254/latest/meta-data/"),
            Duration::from_secs(10),
        )
        .await;

        assert_eq!(response, HttpResponseDto::failed(403, IMDS_BLOCKED_MESSAGE));
    }

    #[tokio::test]
    async fn successful_request_returns_status_headers_and_body() {
        let base = spawn_server().await;
        let client = Client::new();

        let response =
            send_http_request(&client, &request(&format!("{base}/hello")), Duration::from_secs(10)).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "hi there");
        assert_eq!(response.headers.get("x-served-by").map(String::as_str), Some("test"));
        assert_eq!(response.error, None);
    }

    #[tokio::test]
    async fn upstream_error_status_is_passed_through() {
        let base = spawn_server().await;
        let client = Client::new();

        let response =
            send_http_request(&client, &request(&format!("{base}/missing")), Duration::from_secs(10)).await;

        assert_eq!(response.status_code, 404);
        assert_eq!(response.error, None);
    }

    #[tokio::test]
    async fn refused_connection_reports_status_zero() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = Client::new();

        let response = send_http_request(
            &client,
            &request(&format!("http://127.0.0.1:{port}/")),
            Duration::from_secs(10),
        )
        .await;

        assert_eq!(response.status_code, 0);
        assert!(response.error.unwrap().starts_with("Connection error: "));
    }

    #[tokio::test]
    async fn invalid_header_is_reported() {
        let client = Client::new();
        let mut req = request("http://127.0.0.1:1/");
        req.headers = Some(BTreeMap::from([("bad header".to_string(), "v".to_string())]));

        let response = send_http_request(&client, &req, Duration::from_secs(10)).await;

        assert_eq!(response.status_code, 0);
        assert!(response.error.unwrap().contains("invalid header name"));
    }

    fn guarded_client() -> Client {
        Client::builder().redirect(redirect_policy()).build().unwrap()
    }

    #[tokio::test]
    async fn redirect_into_metadata_host_is_refused() {
        let base = spawn_server().await;

        let response = send_http_request(
            &guarded_client(),
            &request(&format!("{base}/go")),
            Duration::from_secs(2),
        )
        .await;

        assert_eq!(response, HttpResponseDto::failed(403, IMDS_BLOCKED_MESSAGE));
    }

    #[tokio::test]
    async fn ordinary_redirects_are_followed() {
        let base = spawn_server().await;

        let response = send_http_request(
            &guarded_client(),
            &request(&format!("{base}/hop")),
            Duration::from_secs(10),
        )
        .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "hi there");
    }
}
