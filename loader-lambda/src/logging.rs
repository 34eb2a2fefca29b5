use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a JSON subscriber suitable for CloudWatch.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Timestamps are
/// left out since CloudWatch stamps every line itself.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_ansi(false).without_time())
        .init();
}
