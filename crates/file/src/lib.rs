//! Present an S3 object or a local path uniformly as a local file
//!
//! This crate resolves a path string that may name either a local file or an
//! S3 object (`s3://bucket/key`) to a path on the local filesystem. Remote
//! content is materialized into a temporary file whose lifetime is bound to
//! the owning [`LocalFile`]; local paths pass through untouched apart from
//! normalization.
//!
//! # Resolution Flow
//!
//! Resolution is a two-step flow so path logic stays testable without
//! network access:
//!
//! - [`FileSource::parse`] - pure step: normalize the input and classify it
//!   as local or S3
//! - [`LocalFile::materialize`] - I/O step: download the object into a fresh
//!   temporary file through an [`ObjectFetcher`]
//!
//! [`LocalFile::open`] chains both and constructs the S3 client from a
//! [`ClientConfig`] when the input is remote.
//!
//! # Example
//!
//! ```ignore
//! use s3_localize_file::{ClientConfig, LocalFile};
//!
//! let file = LocalFile::open("s3://my-bucket/data/points.csv", &ClientConfig::default()).await?;
//! let contents = std::fs::read(file.path())?;
//! // The temporary copy is deleted when `file` is dropped.
//! ```

mod error;
mod localize;
mod s3;

use std::path::{Path, PathBuf};

pub use error::{FileError, Result};
pub use localize::{LocalFile, ObjectFetcher};
pub use s3::{ClientConfig, S3Client, DEFAULT_MAX_ATTEMPTS, DEFAULT_SESSION_NAME};

// Retry mode is part of ClientConfig's surface; re-exported so callers
// don't need a direct aws-config dependency.
pub use aws_config::retry::RetryMode;

/// URI scheme prefix that marks an input as an S3 reference.
pub const S3_SCHEME: &str = "s3://";

/// Unified source type representing a file location
///
/// This is the pure half of resolution: parsing never performs I/O.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Local filesystem path, already normalized
    Local(PathBuf),
    /// S3 object reference
    S3(S3Location),
}

impl FileSource {
    /// Parse a string into a FileSource, auto-detecting the source type
    ///
    /// The input is normalized first; a normalized input starting with
    /// `s3://` is an S3 reference, everything else is a local path.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = normalize(input);
        if normalized.starts_with(S3_SCHEME) {
            Ok(FileSource::S3(S3Location::parse(&normalized)?))
        } else {
            Ok(FileSource::Local(PathBuf::from(normalized)))
        }
    }
}

/// A parsed `s3://bucket/key` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    /// Bucket name
    pub bucket: String,
    /// Full object key within the bucket
    pub key: String,
}

impl S3Location {
    /// Parse an S3 URI in the format: s3://bucket/key/to/file
    ///
    /// Expects a normalized URI (see [`normalize`]). Both the bucket and the
    /// key must be non-empty; anything else is a malformed reference.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(S3_SCHEME)
            .ok_or_else(|| FileError::MalformedReference(uri.to_string()))?;

        let (bucket, key) = rest
            .split_once('/')
            .ok_or_else(|| FileError::MalformedReference(uri.to_string()))?;
        if bucket.is_empty() || key.is_empty() {
            return Err(FileError::MalformedReference(uri.to_string()));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Get the file extension of the key's last segment, without the dot
    ///
    /// Empty when the last segment has no `.` in it. Used to give the
    /// materialized temporary file a matching suffix.
    pub fn extension(&self) -> &str {
        let name = self.key.rsplit('/').next().unwrap_or("");
        match name.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => "",
        }
    }

    /// Render back to `s3://bucket/key` form for display and logging
    pub fn uri(&self) -> String {
        format!("{}{}/{}", S3_SCHEME, self.bucket, self.key)
    }
}

/// Normalize a path string without touching the filesystem
///
/// - Empty input stays empty.
/// - Input containing a scheme separator (`:/`) keeps the scheme prefix
///   verbatim while the remainder is lexically cleaned, so
///   `s3://bucket//a//b` becomes `s3://bucket/a/b` without corrupting the
///   scheme's double slash.
/// - Anything else is cleaned as an ordinary local path.
pub fn normalize(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    match input.split_once(":/") {
        Some((scheme, rest)) => format!("{scheme}:/{}", clean(rest)),
        None => clean(input),
    }
}

/// Lexical path cleanup: collapse duplicate separators, drop `.` segments.
fn clean(path: &str) -> String {
    let cleaned: PathBuf = Path::new(path).components().collect();
    cleaned.to_string_lossy().into_owned()
}
