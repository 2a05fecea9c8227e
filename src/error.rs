//! Error types for csvgen
//!
//! Only fatal failures live here. Per-document decode failures are
//! recoverable and use [`crate::decode::DecodeError`] instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for csvgen operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Filesystem error while walking the manifest directory, reading a
    /// manifest, or writing the generated output
    #[error("io error at {}: {source}", .path.display())]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The aggregated manifests cannot produce a valid ClusterServiceVersion
    #[error("validation: {0}")]
    Validation(String),

    /// Two ServiceAccounts with different names were found
    #[error(
        "conflicting ServiceAccount manifests: '{first}' ({}) and '{second}' ({})",
        .first_path.display(),
        .second_path.display()
    )]
    IdentityConflict {
        /// Name recorded first
        first: String,
        /// File the first name came from
        first_path: PathBuf,
        /// Conflicting name
        second: String,
        /// File the conflicting name came from
        second_path: PathBuf,
    },

    /// Encoding the generated ClusterServiceVersion failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an I/O error bound to the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
