//! Error types and result types for document store operations.
//!
//! Ordinary "nothing matched" outcomes are never errors; these variants cover
//! malformed input handed to the store and serialization failures in the typed layer.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Invalid store or collection configuration.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The document has an invalid structure, such as an unhashable identifier.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The document has no value under the collection's identifier field.
    #[error("Document is missing identifier field {0}")]
    MissingIdentifier(String),
    /// A filter document could not be interpreted.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    /// An update document could not be interpreted.
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
