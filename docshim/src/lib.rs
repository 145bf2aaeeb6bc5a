//! docshim: an embedded, in-memory stand-in for a document database client.
//!
//! Application code written against a collection's `count_documents`, `insert_one`,
//! `find`, `find_one`, `update_one` and `aggregate` operations can run unmodified against
//! local memory when no database is reachable, and tests can run without a network.
//!
//! # Quick Start
//!
//! ```ignore
//! use bson::doc;
//! use docshim::{prelude::*, memory::InMemoryStore};
//!
//! let mut store = InMemoryStore::new();
//! let activities = store.collection_mut("activities");
//!
//! seed_if_empty(activities, [doc! {
//!     "_id": "Chess Club",
//!     "schedule_details": { "days": ["Monday", "Friday"] },
//!     "max_participants": 12,
//!     "participants": ["michael@mergington.edu"],
//! }])?;
//!
//! let result = activities.update_one(
//!     &Filter::new().eq("_id", "Chess Club"),
//!     &Update::new().push("participants", "x@mergington.edu"),
//! )?;
//! assert_eq!(result.modified_count, 1);
//!
//! let days = activities
//!     .aggregate(&[])?
//!     .filter_map(|record| record.get_str("_id").ok().map(str::to_string))
//!     .collect::<Vec<_>>();
//! assert_eq!(days, vec!["Friday", "Monday"]);
//! ```
//!
//! # Typed documents
//!
//! ```ignore
//! use docshim::{prelude::*, memory::InMemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Teacher {
//!     #[serde(rename = "_id")]
//!     pub username: String,
//!     pub display_name: String,
//!     pub role: String,
//! }
//!
//! impl Document for Teacher {
//!     fn collection_name() -> &'static str { "teachers" }
//! }
//!
//! let mut store = InMemoryStore::new();
//! let mut teachers = store.typed_collection::<Teacher>();
//! teachers.insert(&Teacher {
//!     username: "mchen".into(),
//!     display_name: "Mr. Chen".into(),
//!     role: "teacher".into(),
//! })?;
//!
//! let found = teachers.find_one(&Filter::new().eq("_id", "mchen"))?;
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory collections and the named-collection store

pub mod prelude;

pub use docshim_core::{collection, document, error, path, query, seed, update};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docshim_memory::{
        DEFAULT_GROUP_PATH, Distinct, Find, InMemoryCollection, InMemoryCollectionBuilder, InMemoryStore,
        InMemoryStoreBuilder,
    };
}
