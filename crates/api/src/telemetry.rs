//! Tracing subscriber initialisation.
//!
//! Structured JSON logs in production mode, human-readable output in
//! development. No exporter pipeline — logs go to stdout.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// The filter honours `RUST_LOG` when set, falling back to
/// [`default_filter`]. Development mode uses human-readable output and
/// widens the filter so the per-request `tower_http` events (method, path,
/// status, latency) actually pass; production emits JSON.
///
/// # Errors
///
/// Returns an error if a subscriber has already been set.
pub fn init(log_level: &str, development: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level, development)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if development {
        builder.try_init()
    } else {
        builder.json().try_init()
    };

    result.map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}

/// Default filter directive for the given level and mode.
///
/// `tower_http`'s request-logging layer emits its span and response events
/// at DEBUG; without the extra directive a default `info` filter would drop
/// every request line in development.
fn default_filter(log_level: &str, development: bool) -> String {
    if development {
        format!("{log_level},tower_http=debug")
    } else {
        log_level.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_filter_passes_request_logging_events() {
        assert_eq!(default_filter("info", true), "info,tower_http=debug");
    }

    #[test]
    fn production_filter_is_the_configured_level() {
        assert_eq!(default_filter("warn", false), "warn");
    }

    #[test]
    fn filter_directives_parse() {
        for directive in [default_filter("info", true), default_filter("info", false)] {
            assert!(directive.parse::<EnvFilter>().is_ok(), "bad filter {directive}");
        }
    }
}
