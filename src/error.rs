//! Error types for the messenger-analysis library.
//!
//! Every fatal condition of a pipeline run is one of these variants. None of
//! them are retried: they surface to the binary, which reports them and exits.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while staging, normalizing or reporting on an export.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The raw extract directory does not exist
    #[error("No extract found at {}", .0.display())]
    MissingArchive(PathBuf),

    /// The raw extract exists but has no `messages/inbox` subtree
    #[error(
        "Invalid export at {}: no messages/inbox directory, ensure the zip used was downloaded from Facebook",
        .0.display()
    )]
    MissingInbox(PathBuf),

    /// Neither an extract nor the zip to extract it from exist
    #[error("No export zip found at {}", .0.display())]
    MissingZip(PathBuf),

    /// Canonical tables are still absent after a recomputation
    #[error("Processed data missing after recomputation: {reason}")]
    MissingArtifact {
        /// Which artifact was missing
        reason: String,
    },

    /// A conversation fragment could not be parsed
    #[error("Malformed message file {}: {source}", .path.display())]
    MalformedFragment {
        /// Fragment file path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Archive extraction errors
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Directory traversal errors
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with AnalysisError
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl From<anyhow::Error> for AnalysisError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
