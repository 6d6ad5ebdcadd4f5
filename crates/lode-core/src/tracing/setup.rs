//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the lode tracing/logging system.
///
/// Reads the `LODE_LOG` environment variable for per-subsystem log levels.
/// Format: `LODE_LOG=lode_analysis=debug,lode_storage=warn`
///
/// Falls back to `lode=info` if `LODE_LOG` is not set or is invalid.
///
/// This function is idempotent; calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("LODE_LOG").unwrap_or_else(|_| EnvFilter::new("lode=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
