//! Logging, powered by tracing-subscriber.

use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Text,
    /// JSON lines for log collectors.
    Json,
}

pub const DEFAULT_FILTER: &str = "info";

/// Build the filter from a `HUB_LOG` style directive string.
///
/// # Errors
///
/// Returns an error if the directive string is malformed.
pub fn build_env_filter(directives: Option<&str>) -> anyhow::Result<EnvFilter> {
    let directives = directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{directives}': {e}"))
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays machine-readable.
///
/// # Errors
///
/// Returns an error if the filter is malformed or a subscriber is already set.
pub fn init_logging(directives: Option<&str>, format: LogFormat) -> anyhow::Result<()> {
    let filter = build_env_filter(directives)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}
