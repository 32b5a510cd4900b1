//! `tracing` subscriber setup for the binary.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Filter used when the requested directive does not parse.
const FALLBACK_FILTER: &str = "warn";

/// Install the global subscriber. Calling it twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn init(filter: &str, json: bool) {
    let (env_filter, rejected) = build_filter(filter);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Some(err) = rejected {
        warn!(filter, error = %err, "invalid log filter, using {FALLBACK_FILTER}");
    }
}

/// `filter` as an [`EnvFilter`], or [`FALLBACK_FILTER`] plus the parse error.
fn build_filter(filter: &str) -> (EnvFilter, Option<ParseError>) {
    match EnvFilter::try_new(filter) {
        Ok(f) => (f, None),
        Err(err) => (EnvFilter::new(FALLBACK_FILTER), Some(err)),
    }
}
