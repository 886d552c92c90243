use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Maps the `LOG_LEVEL` vocabulary (debug|info|warning|error) onto a tracing
/// filter directive. Unknown values fall back to `info`.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.trim().to_lowercase().as_str() {
        "debug" => "debug",
        "info" => "info",
        "warning" | "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Installs the global JSON subscriber writing to stdout.
///
/// `RUST_LOG` takes precedence over `log_level` when set. The returned guard
/// must be held for the lifetime of the process so buffered lines are flushed.
pub fn init_tracing(log_level: &str) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(log_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(true),
        )
        .try_init();

    guard
}
