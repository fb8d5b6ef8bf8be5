//! Diagnostics setup for applications embedding the repository.
//!
//! The repository never fails a query; it reports skipped documents and missing
//! directories through `tracing`. Install a subscriber to see them.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Level for a `-v` count: info, then debug, then trace
#[must_use]
pub const fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Filter defaulting to the verbosity level, overridable through `RUST_LOG`
#[must_use]
pub fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy()
}

/// Install a compact human-readable subscriber
///
/// # Errors
/// Returns `TryInitError` if a global subscriber is already installed
pub fn init(verbosity: u8) -> Result<(), TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter(verbosity))
        .with(fmt_layer)
        .try_init()
}

/// Install a subscriber emitting one JSON object per event
///
/// # Errors
/// Returns `TryInitError` if a global subscriber is already installed
pub fn init_json(verbosity: u8) -> Result<(), TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(false);

    tracing_subscriber::registry()
        .with(filter(verbosity))
        .with(fmt_layer)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::INFO);
        assert_eq!(level_for(1), LevelFilter::DEBUG);
        assert_eq!(level_for(7), LevelFilter::TRACE);
    }

    #[test]
    fn second_install_is_an_error() {
        // Another test may have installed one already; either way the last call must fail.
        let _ = init(0);
        assert!(init_json(0).is_err());
    }
}
