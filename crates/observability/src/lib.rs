//! Process-wide tracing setup shared by the binaries.

/// Install the JSON log subscriber with the default `info` filter.
///
/// Safe to call multiple times; only the first call installs anything.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, formatting).
pub mod tracing;
