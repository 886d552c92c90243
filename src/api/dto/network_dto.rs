//! Network check and outbound HTTP request DTOs

use std::collections::BTreeMap;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const ALLOWED_HTTP_METHODS: [&str; 3] = ["GET", "HEAD", "OPTIONS"];

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NetworkCheckRequest {
    #[validate(length(min = 1, max = 253), custom(function = "validate_host"))]
    pub host: String,
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: i64,
}

impl NetworkCheckRequest {
    /// Port after validation; `None` only if `validate` was skipped.
    pub fn port(&self) -> Option<u16> {
        u16::try_from(self.port).ok().filter(|p| *p > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub output: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HttpRequestDto {
    #[validate(custom(function = "validate_http_url"))]
    pub url: String,
    #[serde(default = "default_method")]
    #[validate(custom(function = "validate_method"))]
    pub method: String,
    pub headers: Option<BTreeMap<String, String>>,
    #[validate(custom(function = "reject_body"))]
    pub body: Option<String>,
}

impl HttpRequestDto {
    pub fn normalized_method(&self) -> String {
        self.method.trim().to_ascii_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponseDto {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub error: Option<String>,
}

impl HttpResponseDto {
    pub fn failed(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body: String::new(),
            error: Some(error.into()),
        }
    }
}

fn default_method() -> String {
    "GET".to_string()
}

fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-') {
        Ok(())
    } else {
        Err(ValidationError::new("host").with_message("Invalid host format".into()))
    }
}

fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(ValidationError::new("url").with_message("URL must be an absolute http(s) URL".into())),
    }
}

fn validate_method(method: &str) -> Result<(), ValidationError> {
    let upper = method.trim().to_ascii_uppercase();
    if ALLOWED_HTTP_METHODS.contains(&upper.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("method")
            .with_message(format!("Method must be one of: {}", ALLOWED_HTTP_METHODS.join(", ")).into()))
    }
}

fn reject_body(body: &str) -> Result<(), ValidationError> {
    if body.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new("body")
            .with_message("Request body is not allowed for GET, HEAD or OPTIONS".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(host: &str, port: i64) -> NetworkCheckRequest {
        NetworkCheckRequest {
            host: host.to_string(),
            port,
        }
    }

    fn http(url: &str, method: &str, body: Option<&str>) -> HttpRequestDto {
        HttpRequestDto {
            url: url.to_string(),
            method: method.to_string(),
            headers: None,
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn network_check_accepts_hostnames_and_ips() {
        assert!(check("db.internal-svc.local", 5432).validate().is_ok());
        assert!(check("10.0.0.1", 1).validate().is_ok());
        assert!(check("10.0.0.1", 65535).validate().is_ok());
    }

    #[test]
    fn network_check_rejects_bad_host_or_port() {
        assert!(check("evil.com; rm -rf /", 80).validate().is_err());
        assert!(check("", 80).validate().is_err());
        assert!(check("example.com", 0).validate().is_err());
        assert!(check("example.com", 65536).validate().is_err());
        assert_eq!(check("example.com", 443).port(), Some(443));
    }

    #[test]
    fn http_request_method_is_case_insensitive() {
        let req = http("http://example.com/", "head", None);
        assert!(req.validate().is_ok());
        assert_eq!(req.normalized_method(), "HEAD");
    }

    #[test]
    fn http_request_rejects_unsafe_input() {
        assert!(http("http://example.com/", "POST", None).validate().is_err());
        assert!(http("http://example.com/", "GET", Some("payload")).validate().is_err());
        assert!(http("ftp://example.com/", "GET", None).validate().is_err());
        assert!(http("/relative/path", "GET", None).validate().is_err());
        assert!(http("http://example.com/", "GET", Some("")).validate().is_ok());
    }

    #[test]
    fn method_defaults_to_get() {
        let req: HttpRequestDto = serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();
        assert_eq!(req.method, "GET");
    }
}
