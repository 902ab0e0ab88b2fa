//! Error types for the file localization crate.

use thiserror::Error;

/// Errors that can occur while resolving or materializing a file.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Malformed S3 reference '{0}': expected s3://bucket/key")]
    MalformedReference(String),

    #[error("Failed to download {location}")]
    DownloadFailed {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Temporary file error")]
    TempFile(#[from] std::io::Error),
}

/// Result type alias for file localization operations.
pub type Result<T> = std::result::Result<T, FileError>;
