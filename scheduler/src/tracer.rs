use std::io;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const TRACE_JSON_ENV: &str = "TIMELINE_TRACE_JSON";

/// Install the global subscriber.
///
/// Environment variables:
/// - RUST_LOG: log filter (default: warn)
/// - TIMELINE_TRACE_JSON: emit JSON lines instead of compact text
///
/// Output goes to stderr so it never interleaves with the terminal view or
/// JSON written to stdout.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_json = std::env::var(TRACE_JSON_ENV)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .compact(),
            )
            .init();
    }
    debug!(json = use_json, "tracing initialized");
}
