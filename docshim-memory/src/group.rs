//! Distinct-value grouping over an array field.
//!
//! This is the single grouping shape the store supports: collect the scalar elements of
//! the array at one path across every document, drop duplicates, sort ascending and emit
//! one `{ <id field>: value }` record per distinct value.

use std::{cmp::Ordering, vec::IntoIter};

use bson::{Bson, Document};

use docshim_core::path::PathResolver;

use crate::evaluator::Comparable;

/// Collects the sorted distinct scalar values found in arrays at `path`.
///
/// Documents where the path is missing or not an array contribute nothing.
pub(crate) fn distinct_values<'a>(
    documents: impl IntoIterator<Item = &'a Document>,
    resolver: PathResolver,
    path: &str,
) -> Vec<Bson> {
    let mut values = Vec::new();

    for document in documents {
        let Some(Bson::Array(items)) = resolver.resolve(document, path) else {
            continue;
        };

        for item in items {
            if Comparable::from(item).is_scalar() {
                values.push(item.clone());
            } else {
                log::debug!("Skipping non-scalar value {item} at {path}");
            }
        }
    }

    values.sort_by(|a, b| Comparable::from(a).total_cmp(&Comparable::from(b)));
    values.dedup_by(|a, b| Comparable::from(&*a).total_cmp(&Comparable::from(&*b)) == Ordering::Equal);
    values
}

/// Cursor over grouped records, one per distinct value.
#[derive(Debug, Clone)]
pub struct Distinct {
    values: IntoIter<Bson>,
    id_field: String,
}

impl Distinct {
    pub(crate) fn new(values: Vec<Bson>, id_field: impl Into<String>) -> Self {
        Self { values: values.into_iter(), id_field: id_field.into() }
    }
}

impl Iterator for Distinct {
    type Item = Document;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.values.next()?;

        let mut record = Document::new();
        record.insert(self.id_field.as_str(), value);
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl ExactSizeIterator for Distinct {}
