//! Diagnostics for `transact-cli`.
//!
//! Every subcommand prints its answer on stdout, so diagnostics go to
//! stderr and never mix into a pipe. Verbosity comes from `--log-level` or `TRANSACT_LOG`; a `RUST_LOG`
//! in the environment takes precedence over both. To watch the codec while
//! leaving the CLI quiet:
//!
//! ```text
//! transact-cli --log-level 'warn,algokit_transact::transaction=debug' encode - < tx.json
//! ```

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when `--log-level` does not parse as a filter.
const FALLBACK_LEVEL: &str = "warn";

/// Shape of the diagnostic lines, picked with `--log-format` or
/// `TRANSACT_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Parse a filter directive string, falling back to [`FALLBACK_LEVEL`].
fn level_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Install the process-wide subscriber. Must run once, before any command.
pub fn init_logging(default_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(false),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .init(),
    }

    tracing::debug!(?format, "diagnostics on stderr");
}
