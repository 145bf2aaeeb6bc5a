//! Backend-independent contracts for docshim, an embedded document store that stands in
//! for a document database client.
//!
//! This crate provides:
//!
//! - **Path resolution** ([`path`]) - Dotted field paths against nested documents
//! - **Filters** ([`query`]) - Typed equality, membership and range conditions
//! - **Updates** ([`update`]) - `$push`/`$pull` array mutations and their results
//! - **Collections** ([`collection`]) - The collection contract and its typed wrapper
//! - **Documents** ([`document`]) - Identifier keys and typed document serialization
//! - **Seeding** ([`seed`]) - Populating collections that start out empty
//! - **Error handling** ([`error`]) - Error and result types

#[allow(unused_extern_crates)]
extern crate self as docshim_core;

pub mod collection;
pub mod document;
pub mod error;
pub mod path;
pub mod query;
pub mod seed;
pub mod update;
