//! List-mutation updates and their results.
//!
//! An [`Update`] appends values to (`$push`) or removes values from (`$pull`) arrays
//! addressed by dotted paths. Pushes are applied before pulls.

use bson::{Bson, Document};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Array mutations applied to a single matched document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    push: Vec<(String, Bson)>,
    pull: Vec<(String, Bson)>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the array at `field`.
    pub fn push(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        set_entry(&mut self.push, field.into(), value.into());
        self
    }

    /// Removes the first element equal to `value` from the array at `field`.
    pub fn pull(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        set_entry(&mut self.pull, field.into(), value.into());
        self
    }

    pub fn pushes(&self) -> &[(String, Bson)] {
        &self.push
    }

    pub fn pulls(&self) -> &[(String, Bson)] {
        &self.pull
    }

    pub fn is_empty(&self) -> bool {
        self.push.is_empty() && self.pull.is_empty()
    }

    /// Renders the update in database syntax.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();

        for (operator, entries) in [("$push", &self.push), ("$pull", &self.pull)] {
            if !entries.is_empty() {
                document.insert(operator, entries.iter().cloned().collect::<Document>());
            }
        }

        document
    }
}

fn set_entry(entries: &mut Vec<(String, Bson)>, field: String, value: Bson) {
    match entries.iter().position(|(existing, _)| *existing == field) {
        Some(index) => entries[index].1 = value,
        None => entries.push((field, value)),
    }
}

impl TryFrom<Document> for Update {
    type Error = DocumentStoreError;

    fn try_from(document: Document) -> DocumentStoreResult<Self> {
        let mut update = Update::new();

        for (operator, fields) in document {
            let entries = match operator.as_str() {
                "$push" => &mut update.push,
                "$pull" => &mut update.pull,
                unsupported => {
                    log::debug!("Ignoring unsupported update operator {unsupported}");
                    continue;
                },
            };

            let fields = match fields {
                Bson::Document(fields) => fields,
                other => {
                    return Err(DocumentStoreError::InvalidUpdate(format!(
                        "{operator} requires a document of field paths, got {other}"
                    )));
                },
            };

            for (field, value) in fields {
                set_entry(entries, field, value);
            }
        }

        Ok(update)
    }
}

/// The outcome of a single-document update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Number of documents selected by the filter (0 or 1).
    pub matched_count: u64,
    /// Number of documents actually changed (0 or 1).
    pub modified_count: u64,
}
