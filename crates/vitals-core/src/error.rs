//! Error types for vitals core operations.
//!
//! Missing files and sparse records are not errors; they normalize to empty
//! collections and defaulted fields. What remains here is the small set of
//! conditions a caller has to stop on and report.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for vitals operations.
pub type Result<T> = std::result::Result<T, VitalsError>;

/// Core error type for vitals operations.
#[derive(Debug, Error)]
pub enum VitalsError {
    /// Filesystem error while reading or writing a backing file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backing file exists but cannot be parsed
    #[error("Corrupt data file {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },

    /// The external health client failed
    #[error("Client error: {0}")]
    Client(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl VitalsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VitalsError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        VitalsError::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error means a backing file is structurally broken.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, VitalsError::Corrupt { .. })
    }
}

impl From<std::io::Error> for VitalsError {
    fn from(err: std::io::Error) -> Self {
        VitalsError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for VitalsError {
    fn from(err: serde_json::Error) -> Self {
        VitalsError::Other(format!("JSON error: {}", err))
    }
}
