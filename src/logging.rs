//! Tracing setup for the `reorder` binary.
//!
//! Events go to stderr so that stdout stays clean for `--json` output. The
//! filter comes from `REORDER_LOG` (same syntax as `RUST_LOG`) and defaults
//! to `warn`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "REORDER_LOG";

/// Install the global subscriber. Calling it twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
