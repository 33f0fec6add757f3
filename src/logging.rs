//! Tracing setup for the `cmdrunner` binary.
//!
//! Logs go to stderr so that `--print` output and echoed child stdout stay
//! clean. `RUST_LOG` takes precedence over the built-in filters.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "cmdrunner=info,warn";
const VERBOSE_FILTER: &str = "cmdrunner=debug,info";

/// Build the filter used when `RUST_LOG` is unset or invalid.
#[must_use]
pub fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(false)
                .with_file(false)
                .compact(),
        )
        .try_init()?;
    Ok(())
}
