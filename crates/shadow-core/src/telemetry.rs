//! Tracing subscriber setup
//!
//! Services embedding the orchestrator usually install their own subscriber;
//! this is the default used by binaries and local runs.

use crate::error::TelemetryError;
use tracing_subscriber::EnvFilter;

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingFormat {
    /// Human-readable lines
    #[default]
    Plain,
    /// One JSON object per event
    Json,
}

/// Install a global fmt subscriber filtered by `RUST_LOG` (default `info`)
///
/// # Errors
/// Returns `TelemetryError` if a global subscriber is already installed.
pub fn init_tracing(format: TracingFormat) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match format {
        TracingFormat::Plain => builder.try_init(),
        TracingFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| TelemetryError(e.to_string()))
}
