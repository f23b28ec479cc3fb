use std::path::PathBuf;
use thiserror::Error;

/// Failure while writing the summary file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write summary to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV summary to {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Failure while setting up the tracing subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter directive: {0}")]
    InvalidFilter(String),

    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}
