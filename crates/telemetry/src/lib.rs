//! Logging bootstrap for venuehub.

use tracing_subscriber::EnvFilter;

use venuehub_kernel::settings::{LogFormat, TelemetrySettings};

/// Install the global tracing subscriber. `RUST_LOG` wins over the default
/// `info` filter; a second call is a no-op so tests can run this freely.
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match settings.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .try_init()
                .ok();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .ok();
        }
    }

    tracing::debug!(format = ?settings.log_format, "telemetry initialized");
}
