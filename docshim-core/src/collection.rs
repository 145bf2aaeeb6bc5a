//! The collection contract shared by every backend, and its typed wrapper.
//!
//! [`DocumentCollection`] mirrors the operations of a document database client's
//! collection handle, so application code can run against any implementation.
//! [`TypedCollection`] layers serde conversions for [`Document`] types on top.

use std::{borrow::Borrow, marker::PhantomData};

use crate::{
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    query::Filter,
    update::{Update, UpdateResult},
};

/// Operations of a single document collection.
///
/// Implementations report "nothing matched" through ordinary values (zero counts,
/// `None`, empty cursors); errors are reserved for malformed input or backend failures.
pub trait DocumentCollection {
    /// Lazy sequence of matching documents produced by [`DocumentCollection::find`].
    type Cursor<'a>: Iterator<Item = bson::Document>
    where
        Self: 'a;

    /// Lazy sequence of grouped records produced by [`DocumentCollection::aggregate`].
    type Aggregate<'a>: Iterator<Item = bson::Document>
    where
        Self: 'a;

    /// Counts the documents matching `filter`.
    fn count_documents(&self, filter: &Filter) -> DocumentStoreResult<u64>;

    /// Stores a copy of `document` under its identifier, replacing any document with the same identifier.
    fn insert_one(&mut self, document: impl Borrow<bson::Document>) -> DocumentStoreResult<()>;

    /// Returns a cursor over copies of the documents matching `filter`.
    fn find(&self, filter: Filter) -> DocumentStoreResult<Self::Cursor<'_>>;

    /// Returns a copy of the first document matching `filter`.
    fn find_one(&self, filter: &Filter) -> DocumentStoreResult<Option<bson::Document>>;

    /// Applies `update` to the first document matching `filter`.
    fn update_one(&mut self, filter: &Filter, update: &Update) -> DocumentStoreResult<UpdateResult>;

    /// Runs a grouping query, yielding one `{ _id: value }` record per group.
    fn aggregate(&self, pipeline: &[bson::Document]) -> DocumentStoreResult<Self::Aggregate<'_>>;
}

/// A collection viewed through a typed [`Document`].
#[derive(Debug)]
pub struct TypedCollection<'a, C: DocumentCollection, D: Document> {
    collection: &'a mut C,
    _marker: PhantomData<D>,
}

impl<'a, C: DocumentCollection, D: Document> TypedCollection<'a, C, D> {
    pub fn new(collection: &'a mut C) -> Self {
        Self { collection, _marker: PhantomData }
    }

    /// Returns the underlying untyped collection.
    pub fn untyped(&mut self) -> &mut C {
        &mut *self.collection
    }

    pub fn count(&self, filter: &Filter) -> DocumentStoreResult<u64> {
        self.collection.count_documents(filter)
    }

    pub fn insert(&mut self, document: &D) -> DocumentStoreResult<()> {
        self.collection.insert_one(document.to_document()?)
    }

    /// Returns a cursor deserializing each matching document.
    pub fn find(&self, filter: Filter) -> DocumentStoreResult<impl Iterator<Item = DocumentStoreResult<D>>> {
        Ok(self.collection.find(filter)?.map(D::from_document))
    }

    pub fn find_one(&self, filter: &Filter) -> DocumentStoreResult<Option<D>> {
        self.collection
            .find_one(filter)?
            .map(D::from_document)
            .transpose()
    }

    pub fn update_one(&mut self, filter: &Filter, update: &Update) -> DocumentStoreResult<UpdateResult> {
        self.collection.update_one(filter, update)
    }

    /// Inserts `documents` only if the collection is empty. See [`seed_if_empty`](crate::seed::seed_if_empty).
    pub fn seed_if_empty(&mut self, documents: impl IntoIterator<Item = D>) -> DocumentStoreResult<bool> {
        let documents = documents
            .into_iter()
            .map(|document| document.to_document())
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        crate::seed::seed_if_empty(&mut *self.collection, documents)
    }
}
