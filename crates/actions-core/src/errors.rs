// Error taxonomy for the command protocol.
// Every failure here reflects either a misconfigured host or a caller bug,
// never a transient condition, so nothing is retried internally.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the workflow and file command protocol.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required environment variable (file path) is unset or blank.
    /// Indicates an unsupported host environment.
    #[error("unable to find environment variable '{variable}' for file command")]
    ConfigurationMissing { variable: String },

    /// The resolved file command target does not exist on disk. The host
    /// runner creates this file before the step starts, so its absence is
    /// fatal to the step.
    #[error("missing file at path '{path}' for file command")]
    FileNotFound { path: PathBuf },

    /// Delimiter collision or an otherwise malformed caller-supplied value.
    #[error("{0}")]
    InvalidArgument(String),

    /// Structured-value encoding failed; surfaced verbatim.
    #[error(transparent)]
    Serialization(#[from] actions_sdk::ValueError),

    /// A write to the output sink or the file command target failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
