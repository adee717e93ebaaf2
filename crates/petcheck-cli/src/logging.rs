//! Diagnostic logging to stderr
//!
//! `RUST_LOG` wins when set; otherwise `warn`, or `info` with `--verbose`.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info,petcheck_runner=info,reqwest=warn"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. Call once, before any scenario runs.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let fmt_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .context("failed to install log subscriber")
}
