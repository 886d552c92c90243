use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tracing::{info, warn};

use crate::api::dto::network_dto::CommandResponse;

/// Attempts one TCP connection and closes it immediately.
pub async fn check_tcp_connectivity(host: &str, port: u16, timeout: Duration) -> CommandResponse {
    let started = Instant::now();
    let target = format!("{host}:{port}");

    let outcome = match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            drop(stream);
            Ok(())
        }
        Ok(Err(err)) => Err(match err.raw_os_error() {
            Some(code) => format!("Error code: {code} ({err})"),
            None => err.to_string(),
        }),
        Err(_) => Err(format!("Connection timed out after {}s", timeout.as_secs())),
    };

    let connection_time_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => {
            info!(host, port, connection_time_ms, "Network connectivity check successful");
            CommandResponse {
                output: format!("Connection successful to {target}"),
                error: None,
            }
        }
        Err(detail) => {
            warn!(host, port, connection_time_ms, error = %detail, "Network connectivity check failed");
            CommandResponse {
                output: format!("Connection unsuccessful to {target}"),
                error: Some(detail),
            }
        }
    }
}
