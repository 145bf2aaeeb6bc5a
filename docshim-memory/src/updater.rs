//! Single-document array updates.
//!
//! Only the first document matching the filter is ever touched, even when several
//! match. That mirrors a single-document update contract, not a bulk update.

use bson::{Bson, Document};

use docshim_core::{
    path::PathResolver,
    query::Filter,
    update::{Update, UpdateResult},
};

use crate::evaluator::{Comparable, DocumentEvaluator};

pub(crate) struct UpdateExecutor {
    resolver: PathResolver,
}

impl UpdateExecutor {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Applies `update` to the first of `documents` matching `filter`.
    pub fn update_first<'a>(
        &self,
        documents: impl IntoIterator<Item = &'a mut Document>,
        filter: &Filter,
        update: &Update,
    ) -> UpdateResult {
        let target = documents
            .into_iter()
            .find(|document| DocumentEvaluator::new(document, self.resolver).matches(filter));

        match target {
            Some(document) => UpdateResult {
                matched_count: 1,
                modified_count: u64::from(self.apply(document, update)),
            },
            None => {
                log::debug!("No document matched {filter}, nothing updated");
                UpdateResult::default()
            },
        }
    }

    /// Applies every push, then every pull. Returns `true` if the document changed.
    pub fn apply(&self, document: &mut Document, update: &Update) -> bool {
        let mut modified = false;

        for (field, value) in update.pushes() {
            match self.resolver.resolve_mut(document, field) {
                Some(Bson::Array(values)) => {
                    values.push(value.clone());
                    modified = true;
                },
                _ => log::debug!("Skipping $push on {field}, not an array"),
            }
        }

        for (field, value) in update.pulls() {
            let Some(Bson::Array(values)) = self.resolver.resolve_mut(document, field) else {
                log::debug!("Skipping $pull on {field}, not an array");
                continue;
            };

            let target = Comparable::from(value);
            match values.iter().position(|item| Comparable::from(item) == target) {
                Some(position) => {
                    values.remove(position);
                    modified = true;
                },
                None => log::debug!("Skipping $pull on {field}, value {value} not present"),
            }
        }

        modified
    }
}
