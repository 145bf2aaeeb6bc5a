//! First-start population of empty collections.

use std::borrow::Borrow;

use crate::{collection::DocumentCollection, error::DocumentStoreResult, query::Filter};

/// Inserts `documents` through the collection's own `insert_one`, but only when the
/// collection holds no documents yet.
///
/// Returns `true` if the documents were inserted.
pub fn seed_if_empty<C, I>(collection: &mut C, documents: I) -> DocumentStoreResult<bool>
where
    C: DocumentCollection,
    I: IntoIterator,
    I::Item: Borrow<bson::Document>,
{
    let existing = collection.count_documents(&Filter::new())?;

    if existing > 0 {
        log::debug!("Skipping seed, collection already holds {existing} documents");
        return Ok(false);
    }

    let mut inserted = 0usize;
    for document in documents {
        collection.insert_one(document)?;
        inserted += 1;
    }

    log::debug!("Seeded {inserted} documents");

    Ok(true)
}
