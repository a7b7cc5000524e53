use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the JSON subscriber at the default `info` level.
pub fn init_tracing() {
    init_tracing_with("info");
}

/// Install a JSON subscriber for hosts embedding the engine.
///
/// `RUST_LOG` overrides `default_directive`. Returns false when a global
/// subscriber was already installed.
pub fn init_tracing_with(default_directive: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let json = fmt::layer()
        .json()
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .try_init()
        .is_ok()
}
