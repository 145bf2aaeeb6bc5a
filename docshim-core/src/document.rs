//! Document identity and typed document serialization.
//!
//! Stored documents are plain [`bson::Document`] values. Application types that map onto
//! a collection implement [`Document`] and get BSON/JSON conversions through
//! [`DocumentExt`].

use std::fmt;

use bson::{Bson, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, from_value, to_value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// The identifier field used when none is configured.
pub const DEFAULT_ID_FIELD: &str = "_id";

/// A hashable key derived from a document's identifier value.
///
/// Only scalar identifiers are supported. Integers of either width map to the same key,
/// so `1i32` and `1i64` address the same document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentId {
    String(String),
    Int(i64),
    Bool(bool),
    ObjectId(ObjectId),
}

impl TryFrom<&Bson> for DocumentId {
    type Error = DocumentStoreError;

    fn try_from(value: &Bson) -> DocumentStoreResult<Self> {
        match value {
            Bson::String(value) => Ok(DocumentId::String(value.clone())),
            Bson::Int32(value) => Ok(DocumentId::Int(i64::from(*value))),
            Bson::Int64(value) => Ok(DocumentId::Int(*value)),
            Bson::Boolean(value) => Ok(DocumentId::Bool(*value)),
            Bson::ObjectId(value) => Ok(DocumentId::ObjectId(*value)),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "unsupported identifier value {other}"
            ))),
        }
    }
}

impl From<DocumentId> for Bson {
    fn from(id: DocumentId) -> Self {
        match id {
            DocumentId::String(value) => Bson::String(value),
            DocumentId::Int(value) => Bson::Int64(value),
            DocumentId::Bool(value) => Bson::Boolean(value),
            DocumentId::ObjectId(value) => Bson::ObjectId(value),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::String(value) => write!(f, "{value}"),
            DocumentId::Int(value) => write!(f, "{value}"),
            DocumentId::Bool(value) => write!(f, "{value}"),
            DocumentId::ObjectId(value) => write!(f, "{value}"),
        }
    }
}

/// Trait for application types stored in a named collection.
///
/// The type's serialized form must contain the collection's identifier field,
/// typically via `#[serde(rename = "_id")]`.
///
/// # Example
///
/// ```ignore
/// use docshim::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Teacher {
///     #[serde(rename = "_id")]
///     pub username: String,
///     pub display_name: String,
///     pub role: String,
/// }
///
/// impl Document for Teacher {
///     fn collection_name() -> &'static str {
///         "teachers"
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Clone {
    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Serialization helpers for [`Document`] types, implemented for all of them.
pub trait DocumentExt: Document {
    /// Converts this value to a BSON document for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value does not serialize to a document.
    fn to_document(&self) -> DocumentStoreResult<bson::Document>;

    /// Creates a value from a stored BSON document.
    fn from_document(document: bson::Document) -> DocumentStoreResult<Self>;

    fn to_json(&self) -> DocumentStoreResult<Value>;

    fn from_json(value: Value) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_document(&self) -> DocumentStoreResult<bson::Document> {
        match serialize_to_bson(self)? {
            Bson::Document(document) => Ok(document),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "{} must serialize to a document, got {other}",
                D::collection_name(),
            ))),
        }
    }

    fn from_document(document: bson::Document) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(document))?)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }
}
