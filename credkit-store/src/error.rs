//! Error types for preference storage operations.

use thiserror::Error;

/// Error returned by preference store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O operation on the backing file failed.
    #[error("store_io: {context}: {source}")]
    IoError {
        /// Context describing the operation.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The stored map could not be serialized.
    #[error("store_serialization: {context}")]
    Serialization {
        /// Description of the failure.
        context: String,
    },

    /// The stored map could not be deserialized (corrupt or truncated file).
    #[error("store_deserialization: {context}")]
    Deserialization {
        /// Description of the failure.
        context: String,
    },
}

impl StoreError {
    /// Creates an [`StoreError::IoError`] with operation context.
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Creates a [`StoreError::Serialization`] error.
    pub(crate) fn serialization(context: impl Into<String>) -> Self {
        Self::Serialization {
            context: context.into(),
        }
    }

    /// Creates a [`StoreError::Deserialization`] error.
    pub(crate) fn deserialization(context: impl Into<String>) -> Self {
        Self::Deserialization {
            context: context.into(),
        }
    }
}

/// Result type for preference store operations.
pub type StoreResult<T> = Result<T, StoreError>;
