use reserved_values::StoreError;
use text_pattern::{ParseError, ResolveError};
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the text-pattern CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading, parsing or saving configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The template could not be parsed.
    #[error("Invalid text pattern: {0}")]
    Parse(#[from] ParseError),

    /// The template could not be resolved with the supplied values.
    #[error("Failed to resolve text pattern: {0}")]
    Resolve(#[from] ResolveError),

    /// The reserved value store could not be started.
    #[error("Failed to start reserved value store: {0}")]
    Store(#[from] StoreError),

    /// Output could not be serialised.
    #[error("Failed to serialise output: {0}")]
    Output(String),
}
