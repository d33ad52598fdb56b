//! Tracing/logging initialization.
//!
//! JSON lines on stdout, filtered by `RUST_LOG` (e.g.
//! `RUST_LOG=splitledger_infra=debug` to see individual netted pairs).

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

/// Initialize tracing with [`DEFAULT_FILTER`] when `RUST_LOG` is unset.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Initialize tracing, falling back to `default_filter` when `RUST_LOG` is
/// unset or invalid. Returns `false` if a global subscriber already existed.
pub fn init_with_default(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok()
}
