use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logs go to stderr; stdout carries only the command's output.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("canary_runner=info,canary_api=info")),
        )
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}
