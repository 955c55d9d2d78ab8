//! # Xncf Storage System Errors
//!
//! [`StorageSystemError`] is the persistence-failure side of the taxonomy:
//! store constraint violations, snapshot I/O, and (de)serialization of
//! configuration, manifests and snapshots.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Module record ({uid}, {version}) already exists")]
    DuplicateRecord { uid: String, version: String },

    #[error("No module record found for '{uid}'")]
    RecordNotFound { uid: String },

    #[error("No menu node with id '{id}'")]
    MenuNodeNotFound { id: String },

    #[error("Serialization to '{format}' failed: {source}")]
    SerializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Deserialization from '{format}' failed: {source}")]
    DeserializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedConfigFormat(String),
}

/// Io error tagged with the operation and the path it failed on
impl StorageSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
