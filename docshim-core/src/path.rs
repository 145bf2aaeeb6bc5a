//! Dotted field path resolution against nested documents.
//!
//! A path such as `schedule_details.days` is split on the delimiter and each segment
//! descends one level into an embedded document. Resolution yields `None` when a
//! segment is missing or the current value is not a document, which keeps a missing
//! field distinguishable from a field that holds `Bson::Null`.

use bson::{Bson, Document};

/// The delimiter used when none is configured.
pub const DEFAULT_DELIMITER: char = '.';

/// Resolves dotted paths using a configurable segment delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathResolver {
    delimiter: char,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl PathResolver {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Returns the value stored at `path`, or `None` if the path does not resolve.
    pub fn resolve<'a>(&self, document: &'a Document, path: &str) -> Option<&'a Bson> {
        let mut segments = path.split(self.delimiter);
        let mut current = document.get(segments.next()?)?;

        for segment in segments {
            current = current.as_document()?.get(segment)?;
        }

        Some(current)
    }

    /// Mutable counterpart of [`PathResolver::resolve`].
    pub fn resolve_mut<'a>(&self, document: &'a mut Document, path: &str) -> Option<&'a mut Bson> {
        let mut segments = path.split(self.delimiter);
        let mut current = document.get_mut(segments.next()?)?;

        for segment in segments {
            current = current.as_document_mut()?.get_mut(segment)?;
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use bson::{doc, Bson};

    use super::*;

    fn activity() -> Document {
        doc! {
            "_id": "Chess Club",
            "schedule_details": {
                "days": ["Monday", "Friday"],
                "start_time": "15:15",
                "room": Bson::Null,
            },
            "max_participants": 12,
        }
    }

    #[test]
    fn resolves_top_level_and_nested_fields() {
        let document = activity();
        let resolver = PathResolver::default();

        assert_eq!(resolver.resolve(&document, "max_participants"), Some(&Bson::Int32(12)));
        assert_eq!(
            resolver.resolve(&document, "schedule_details.start_time"),
            Some(&Bson::String("15:15".to_string())),
        );
    }

    #[test]
    fn missing_segments_are_absent_not_null() {
        let document = activity();
        let resolver = PathResolver::default();

        assert_eq!(resolver.resolve(&document, "schedule_details.room"), Some(&Bson::Null));
        assert_eq!(resolver.resolve(&document, "schedule_details.teacher"), None);
        assert_eq!(resolver.resolve(&document, "nope.days"), None);
        // descending through a scalar fails quietly
        assert_eq!(resolver.resolve(&document, "max_participants.value"), None);
        assert_eq!(resolver.resolve(&document, ""), None);
    }

    #[test]
    fn custom_delimiter() {
        let document = activity();
        let resolver = PathResolver::new('/');

        assert!(resolver.resolve(&document, "schedule_details/days").is_some());
        assert_eq!(resolver.resolve(&document, "schedule_details.days"), None);
    }

    #[test]
    fn resolve_mut_edits_in_place() {
        let mut document = activity();
        let resolver = PathResolver::default();

        if let Some(Bson::Array(days)) = resolver.resolve_mut(&mut document, "schedule_details.days") {
            days.push(Bson::String("Sunday".to_string()));
        }

        assert_eq!(
            document.get_document("schedule_details").unwrap().get_array("days").unwrap().len(),
            3,
        );
    }
}
