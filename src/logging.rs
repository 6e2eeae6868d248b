//! Diagnostic logging for the binary.
//!
//! Output goes to stderr so it never mixes with command output or `--json`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{DeskError, Result};

/// Build the filter: `RUST_LOG` wins, otherwise `fallback` (a level or a full
/// directive such as `issuedesk=debug`).
pub fn filter(fallback: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback)
        .map_err(|_| DeskError::Logging(format!("invalid log level '{fallback}'")))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(fallback: &str) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter(fallback)?)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| DeskError::Logging(e.to_string()))
}
