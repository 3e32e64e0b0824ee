//! Logging initialization for the CLI.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// An explicit `RUST_LOG` always wins; the verbose flag only picks the
/// fallback directives when the environment says nothing.
fn build_filter(verbose: bool, env_directives: Option<&str>) -> EnvFilter {
    match env_directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(if verbose { "txbook=debug" } else { "off" }),
    }
}

pub fn init_logging(verbose: bool) {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbose, env_directives.as_deref());

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(filter)
        .init();
}
