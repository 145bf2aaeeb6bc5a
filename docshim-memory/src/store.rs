//! Named in-memory collections.
//!
//! [`InMemoryStore`] plays the role of a database handle: it owns one
//! [`InMemoryCollection`] per name and creates collections on first use.

use indexmap::IndexMap;

use docshim_core::{
    collection::TypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

use crate::collection::{CollectionOptions, InMemoryCollection, InMemoryCollectionBuilder};

/// An in-memory database holding named collections.
///
/// The store is constructed explicitly and owned by whoever needs it; it performs no
/// internal locking. Code that shares one store across threads must serialize access
/// itself, e.g. with a single mutex around the store.
///
/// # Example
///
/// ```ignore
/// use bson::doc;
/// use docshim::{prelude::*, memory::InMemoryStore};
///
/// let mut store = InMemoryStore::new();
/// store.collection_mut("activities").insert_one(doc! { "_id": "Chess Club" })?;
///
/// assert_eq!(store.list_collections(), vec!["activities"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    /// collection name -> collection, in creation order
    collections: IndexMap<String, InMemoryCollection>,
    /// Options applied to every collection this store creates
    options: CollectionOptions,
}

impl InMemoryStore {
    /// Creates an empty store whose collections use default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for a store whose collections use custom options.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Returns the named collection if it has been created.
    pub fn collection(&self, name: &str) -> Option<&InMemoryCollection> {
        self.collections.get(name)
    }

    /// Returns the named collection, creating it empty if needed.
    pub fn collection_mut(&mut self, name: &str) -> &mut InMemoryCollection {
        let options = &self.options;

        self.collections
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("Creating collection {name}");
                InMemoryCollection::with_options(options.clone())
            })
    }

    /// Returns a typed view of the collection named by `D::collection_name()`.
    pub fn typed_collection<D: Document>(&mut self) -> TypedCollection<'_, InMemoryCollection, D> {
        TypedCollection::new(self.collection_mut(D::collection_name()))
    }

    /// Lists collection names in creation order.
    pub fn list_collections(&self) -> Vec<String> {
        self.collections
            .keys()
            .cloned()
            .collect()
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// The options are applied to every collection the store creates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoreBuilder {
    collection: InMemoryCollectionBuilder,
}

impl InMemoryStoreBuilder {
    /// Sets the identifier field of every collection. Defaults to `_id`.
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.collection = self.collection.id_field(field);
        self
    }

    /// Sets the dotted path delimiter of every collection. Defaults to `.`.
    pub fn path_delimiter(mut self, delimiter: char) -> Self {
        self.collection = self.collection.path_delimiter(delimiter);
        self
    }

    /// Sets the path grouped on by `aggregate` in every collection.
    pub fn group_path(mut self, path: impl Into<String>) -> Self {
        self.collection = self.collection.group_path(path);
        self
    }

    /// Builds an empty store.
    ///
    /// # Errors
    ///
    /// Returns an initialization error if the identifier field or group path is empty.
    pub fn build(self) -> DocumentStoreResult<InMemoryStore> {
        Ok(InMemoryStore {
            collections: IndexMap::new(),
            options: self.collection.into_options()?,
        })
    }
}
