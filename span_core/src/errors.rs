//! # Error Types
//!
//! Structured error types for span_core. These cover dataset ingestion,
//! settings and input parsing. Lookups never produce a [`SpanError`]: a
//! selection that cannot be resolved is reported through
//! [`crate::resolve::LookupMiss`] instead.
//!
//! ## Example
//!
//! ```rust
//! use span_core::errors::{SpanError, SpanResult};
//!
//! fn check_depth(depth_mm: u32) -> SpanResult<()> {
//!     if depth_mm == 0 {
//!         return Err(SpanError::invalid_input("depth_mm", "0", "Depth must be positive"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_depth(150).is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for span_core operations
pub type SpanResult<T> = Result<T, SpanError>;

/// Structured error type for dataset and settings operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SpanError {
    /// An input value is invalid (unparseable, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The reference dataset violates a shape invariant
    #[error("Malformed dataset: {element} at '{path}' - {reason}")]
    MalformedDataset {
        element: String,
        path: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Dataset file is exclusively locked by another process
    #[error("File locked: '{path}' is held exclusively by another process")]
    FileLocked { path: String },

    /// JSON or TOML deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Settings could not be applied
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },
}

impl SpanError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        SpanError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MalformedDataset error
    pub fn malformed(element: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        SpanError::MalformedDataset {
            element: element.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        SpanError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>) -> Self {
        SpanError::FileLocked { path: path.into() }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        SpanError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        SpanError::ConfigError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SpanError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SpanError::InvalidInput { .. } => "INVALID_INPUT",
            SpanError::MalformedDataset { .. } => "MALFORMED_DATASET",
            SpanError::FileError { .. } => "FILE_ERROR",
            SpanError::FileLocked { .. } => "FILE_LOCKED",
            SpanError::SerializationError { .. } => "SERIALIZATION_ERROR",
            SpanError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

impl From<serde_json::Error> for SpanError {
    fn from(e: serde_json::Error) -> Self {
        SpanError::serialization(e.to_string())
    }
}
