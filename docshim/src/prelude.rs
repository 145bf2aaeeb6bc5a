//! Convenient re-exports of commonly used types from docshim.
//!
//! ```ignore
//! use docshim::prelude::*;
//! ```

pub use docshim_core::{
    collection::{DocumentCollection, TypedCollection},
    document::{Document, DocumentExt, DocumentId},
    error::{DocumentStoreError, DocumentStoreResult},
    path::PathResolver,
    query::{Condition, FieldFilter, FieldOp, Filter, FilterVisitor},
    seed::seed_if_empty,
    update::{Update, UpdateResult},
};
