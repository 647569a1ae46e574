//! Tracing subscriber setup for the CLI

use tracing_subscriber::EnvFilter;

/// Install a stderr formatter honouring `RUST_LOG`.
///
/// Without `RUST_LOG` the filter is `basketforge=info`, or `basketforge=debug`
/// when `verbose` is set. Calling this twice is harmless.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "basketforge=debug"
    } else {
        "basketforge=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
