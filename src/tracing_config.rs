//! Tracing setup for the `dts-compare` binary.
//!
//! ```bash
//! DTS_COMPARE_LOG=debug dts-compare reference.json candidate.json
//! DTS_COMPARE_LOG="dts_compare::builder=trace" dts-compare reference.json candidate.json
//! ```
//!
//! Nothing is installed unless `DTS_COMPARE_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "DTS_COMPARE_LOG";

/// Build an `EnvFilter` from `DTS_COMPARE_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Initialise the global subscriber. Output goes to stderr so report lines
/// on stdout stay clean.
pub fn init_tracing() {
    if std::env::var(LOG_ENV).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .init();
}
