//! Tracing subscriber initialization.
//!
//! Events go to stderr so they never mix with the summary on stdout.

use crate::error::LoggingError;
use tracing_subscriber::EnvFilter;

/// Default filter for a verbosity count: 0 → warn, 1 → info, 2+ → debug.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level comes from `verbosity`.
pub fn init(verbosity: u8) -> Result<(), LoggingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive(verbosity))
            .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(7), "debug");
    }

    #[test]
    fn test_second_init_is_rejected() {
        // The first call may already have happened in another test thread
        let _ = init(0);
        assert!(matches!(init(0), Err(LoggingError::SubscriberAlreadySet)));
    }
}
