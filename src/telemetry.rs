//! Logging setup for hosts embedding the news helpers.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the host. [`init_tracing`] installs the usual one: an `EnvFilter` read
//! from `RUST_LOG` (default `info`) and UTC RFC 3339 timestamps.

use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Install a global fmt subscriber.
///
/// Returns false if a global subscriber was already set.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .try_init()
        .is_ok()
}
