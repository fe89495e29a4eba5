//! Diagnostic logging setup.
//!
//! Logs go to stderr so expanded source on stdout stays clean. `RUST_LOG`
//! overrides the default level.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber.
///
/// Defaults to `info`, or `debug` for the copywith crates when `verbose` is
/// set. Calling this more than once is harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into()))
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .try_init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,copywith=debug,copywith_engine=debug,copywith_runtime=debug"
    } else {
        "info"
    }
}
