//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the styledrift logging system.
///
/// Reads `STYLEDRIFT_LOG` for per-module log levels, e.g.
/// `STYLEDRIFT_LOG=styledrift_analysis=debug`.
/// Falls back to `styledrift=info` when unset or invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("STYLEDRIFT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("styledrift=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
