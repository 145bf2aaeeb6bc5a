//! The in-memory document collection.
//!
//! Documents live in an insertion-ordered map keyed by their identifier. Every read hands
//! out clones and every insert stores a clone, so callers can never alias stored state.
//! The collection does no locking of its own: reads borrow it shared, writes borrow it
//! exclusively, and a live [`Find`] cursor keeps the collection borrowed until dropped.

use std::borrow::Borrow;

use bson::Document;
use indexmap::{IndexMap, map::Values};

use docshim_core::{
    collection::DocumentCollection,
    document::{DEFAULT_ID_FIELD, DocumentId},
    error::{DocumentStoreError, DocumentStoreResult},
    path::{DEFAULT_DELIMITER, PathResolver},
    query::Filter,
    update::{Update, UpdateResult},
};

use crate::{
    evaluator::DocumentEvaluator,
    group::{Distinct, distinct_values},
    updater::UpdateExecutor,
};

/// The path grouped on by [`DocumentCollection::aggregate`] when none is configured.
pub const DEFAULT_GROUP_PATH: &str = "schedule_details.days";

/// Settings shared by collections created from the same builder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CollectionOptions {
    pub id_field: String,
    pub resolver: PathResolver,
    pub group_path: String,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            id_field: DEFAULT_ID_FIELD.to_string(),
            resolver: PathResolver::new(DEFAULT_DELIMITER),
            group_path: DEFAULT_GROUP_PATH.to_string(),
        }
    }
}

/// An in-memory collection emulating a document database collection.
///
/// # Example
///
/// ```ignore
/// use bson::doc;
/// use docshim::{prelude::*, memory::InMemoryCollection};
///
/// let mut activities = InMemoryCollection::new();
/// activities.insert_one(doc! {
///     "_id": "Chess Club",
///     "schedule_details": { "days": ["Monday", "Friday"] },
///     "participants": [],
/// })?;
///
/// let result = activities.update_one(
///     &Filter::new().eq("_id", "Chess Club"),
///     &Update::new().push("participants", "x@mergington.edu"),
/// )?;
/// assert_eq!(result.modified_count, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCollection {
    documents: IndexMap<DocumentId, Document>,
    options: CollectionOptions,
}

impl InMemoryCollection {
    /// Creates an empty collection with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for a collection with custom options.
    pub fn builder() -> InMemoryCollectionBuilder {
        InMemoryCollectionBuilder::default()
    }

    pub(crate) fn with_options(options: CollectionOptions) -> Self {
        Self { documents: IndexMap::new(), options }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The field holding each document's identifier.
    pub fn id_field(&self) -> &str {
        &self.options.id_field
    }

    /// The path grouped on by `aggregate`.
    pub fn group_path(&self) -> &str {
        &self.options.group_path
    }

    /// Groups the distinct scalar values of the arrays at `path` across all documents.
    ///
    /// The values are computed eagerly; the records are emitted lazily in ascending order.
    pub fn group_distinct(&self, path: &str) -> Distinct {
        Distinct::new(
            distinct_values(self.documents.values(), self.options.resolver, path),
            self.options.id_field.as_str(),
        )
    }

    fn matches(&self, document: &Document, filter: &Filter) -> bool {
        DocumentEvaluator::new(document, self.options.resolver).matches(filter)
    }
}

impl DocumentCollection for InMemoryCollection {
    type Cursor<'a> = Find<'a>;
    type Aggregate<'a> = Distinct;

    fn count_documents(&self, filter: &Filter) -> DocumentStoreResult<u64> {
        Ok(
            self.documents
                .values()
                .filter(|document| self.matches(document, filter))
                .count() as u64
        )
    }

    fn insert_one(&mut self, document: impl Borrow<Document>) -> DocumentStoreResult<()> {
        let document = document.borrow();
        let id = document
            .get(&self.options.id_field)
            .ok_or_else(|| DocumentStoreError::MissingIdentifier(self.options.id_field.clone()))
            .and_then(DocumentId::try_from)?;

        if self.documents.insert(id.clone(), document.clone()).is_some() {
            log::debug!("Replaced document {id}");
        }

        Ok(())
    }

    fn find(&self, filter: Filter) -> DocumentStoreResult<Self::Cursor<'_>> {
        Ok(Find {
            documents: self.documents.values(),
            filter,
            resolver: self.options.resolver,
        })
    }

    fn find_one(&self, filter: &Filter) -> DocumentStoreResult<Option<Document>> {
        Ok(
            self.documents
                .values()
                .find(|document| self.matches(document, filter))
                .cloned()
        )
    }

    fn update_one(&mut self, filter: &Filter, update: &Update) -> DocumentStoreResult<UpdateResult> {
        let result = UpdateExecutor::new(self.options.resolver)
            .update_first(self.documents.values_mut(), filter, update);

        log::trace!(
            "update_one {filter} {} matched {} modified {}",
            update.to_document(),
            result.matched_count,
            result.modified_count,
        );

        Ok(result)
    }

    /// Groups on the configured group path. The pipeline itself is not interpreted.
    fn aggregate(&self, pipeline: &[Document]) -> DocumentStoreResult<Self::Aggregate<'_>> {
        if !pipeline.is_empty() {
            log::trace!("Ignoring {} pipeline stages, grouping on {}", pipeline.len(), self.options.group_path);
        }

        Ok(self.group_distinct(&self.options.group_path))
    }
}

/// Lazy cursor over copies of the documents matching a filter, in insertion order.
///
/// Each call to [`DocumentCollection::find`] starts a fresh cursor; dropping one
/// part-way through is fine.
pub struct Find<'a> {
    documents: Values<'a, DocumentId, Document>,
    filter: Filter,
    resolver: PathResolver,
}

impl<'a> Iterator for Find<'a> {
    type Item = Document;

    fn next(&mut self) -> Option<Self::Item> {
        let Self { documents, filter, resolver } = self;

        documents
            .find(|document| DocumentEvaluator::new(document, *resolver).matches(filter))
            .cloned()
    }
}

/// Builder for [`InMemoryCollection`] options.
///
/// # Example
///
/// ```ignore
/// use docshim::memory::InMemoryCollection;
///
/// let teachers = InMemoryCollection::builder()
///     .id_field("username")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCollectionBuilder {
    options: CollectionOptions,
}

impl InMemoryCollectionBuilder {
    /// Sets the field that holds each document's identifier. Defaults to `_id`.
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.options.id_field = field.into();
        self
    }

    /// Sets the dotted path segment delimiter. Defaults to `.`.
    pub fn path_delimiter(mut self, delimiter: char) -> Self {
        self.options.resolver = PathResolver::new(delimiter);
        self
    }

    /// Sets the array path grouped on by `aggregate`. Defaults to `schedule_details.days`.
    pub fn group_path(mut self, path: impl Into<String>) -> Self {
        self.options.group_path = path.into();
        self
    }

    pub(crate) fn into_options(self) -> DocumentStoreResult<CollectionOptions> {
        if self.options.id_field.is_empty() {
            return Err(DocumentStoreError::Initialization("identifier field must not be empty".to_string()));
        }

        if self.options.group_path.is_empty() {
            return Err(DocumentStoreError::Initialization("group path must not be empty".to_string()));
        }

        Ok(self.options)
    }

    /// Builds the collection.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Initialization`] if the identifier field or group path is empty.
    pub fn build(self) -> DocumentStoreResult<InMemoryCollection> {
        Ok(InMemoryCollection::with_options(self.into_options()?))
    }
}
