//! In-memory document storage backend for docshim.
//!
//! This crate implements the [`DocumentCollection`](docshim_core::collection::DocumentCollection)
//! contract entirely in memory, so application code written against a document database
//! client can run without a reachable database, and tests can run deterministically.
//!
//! # Features
//!
//! - **Nested queries** - Equality, `$in` and range filters over dotted paths
//! - **Array updates** - `$push`/`$pull` on the first matching document
//! - **Copy isolation** - Inserts store copies and reads return copies
//! - **Grouping** - Sorted distinct values of one array field
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
//! activities.insert_one(doc! {
//!     "_id": "Chess Club",
//!     "schedule_details": { "days": ["Monday", "Friday"] },
//!     "max_participants": 12,
//! })?;
//!
//! let on_monday = activities
//!     .find(Filter::new().any_of("schedule_details.days", ["Monday"]))?
//!     .count();
//! assert_eq!(on_monday, 1);
//! ```

#[allow(unused_extern_crates)]
extern crate self as docshim_memory;

pub mod collection;
mod evaluator;
mod group;
pub mod store;
mod updater;

pub use collection::{DEFAULT_GROUP_PATH, Find, InMemoryCollection, InMemoryCollectionBuilder};
pub use group::Distinct;
pub use store::{InMemoryStore, InMemoryStoreBuilder};
