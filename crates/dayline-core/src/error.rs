//! Core error types for dayline-core.
//!
//! Nothing in the timeline editor is fatal. Malformed day files surface as
//! [`CodecError`], filesystem trouble as [`StorageError`], and both leave the
//! in-memory timeline untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dayline-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Day file persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home or data directory could not be prepared
    #[error("Cannot prepare data directory: {0}")]
    DataDir(String),
}

/// Errors raised by a [`DiaryStore`](crate::storage::DiaryStore).
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading a day file failed for a reason other than absence
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a day file failed
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a day document is rejected as a whole.
///
/// Per-item problems are never errors; they are coerced, clamped or dropped.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Input is not JSON at all
    #[error("day document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// JSON parsed but is neither `{"events": [...]}` nor a bare list
    #[error("day document has an unsupported shape (expected an object with an \"events\" list or a list)")]
    UnsupportedShape,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_error_converts_into_core_error() {
        let err: CoreError = CodecError::UnsupportedShape.into();
        assert!(matches!(err, CoreError::Codec(CodecError::UnsupportedShape)));
        assert!(err.to_string().starts_with("Codec error:"));
    }

    #[test]
    fn malformed_json_message_mentions_json() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = CodecError::from(source);
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn storage_error_reports_path() {
        let err = StorageError::WriteFailed {
            path: PathBuf::from("/tmp/x/20250101.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("20250101.json"));
    }
}
