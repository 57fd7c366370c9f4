//! Diagnostic tracing for the sequencer and its adapters.
//!
//! Diagnostics go to stderr so they never mix with program output on stdout
//! (the `--version` lines, REPL results, eval-wrapper output).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies (the config's
/// `log_filter`, or `debug` under `--log-debug`). Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=bootseq=debug bootseq main.js
/// ```
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
