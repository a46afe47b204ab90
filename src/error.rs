//! Error types for the ods2csv library.

use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for ods2csv operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading the document or writing CSV.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required argument was missing or invalid. Reported before any I/O.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The ZIP stream ended without a `content.xml` file entry.
    #[error("Unable to find \"content.xml\" file entry in ZIP stream")]
    ContentEntryNotFound,

    /// Error reading the ZIP container.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// A batch report could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The `content.xml` markup could not be processed.
    #[error("Failed to process \"content.xml\" entry: {0}")]
    MarkupProcessingFailed(#[source] MarkupIssue),
}

/// A problem reported by the markup event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupIssue {
    /// Byte offset in the decompressed `content.xml` where the problem was
    /// seen, if the reporter knows it.
    pub position: Option<u64>,
    /// Human-readable description.
    pub message: String,
}

impl MarkupIssue {
    /// Create a new issue at the given position.
    pub fn new(position: u64, message: impl Into<String>) -> Self {
        Self {
            position: Some(position),
            message: message.into(),
        }
    }

    /// Create an issue that is not tied to a byte offset.
    pub fn unplaced(message: impl Into<String>) -> Self {
        Self {
            position: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for MarkupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{} (at byte {})", self.message, position),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for MarkupIssue {}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::ZipArchive(other.to_string()),
        }
    }
}

/// Recover an owned I/O error from the shared one quick-xml hands out.
pub(crate) fn io_from_shared(err: Arc<io::Error>) -> io::Error {
    Arc::try_unwrap(err).unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string()))
}
