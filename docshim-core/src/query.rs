//! Filter construction and traversal for document queries.
//!
//! A [`Filter`] maps dotted field paths to a [`Condition`]: either an equality literal or
//! a set of [`FieldOp`] operators. All field conditions must hold for a document to match,
//! and every operator in one set must hold as well.
//!
//! Filters are built fluently or parsed from the database-style document syntax:
//!
//! ```ignore
//! use bson::doc;
//! use docshim::query::Filter;
//!
//! let built = Filter::new()
//!     .any_of("schedule_details.days", ["Monday"])
//!     .gte("max_participants", 15)
//!     .lte("max_participants", 20);
//!
//! let parsed = Filter::try_from(doc! {
//!     "schedule_details.days": { "$in": ["Monday"] },
//!     "max_participants": { "$gte": 15, "$lte": 20 },
//! })?;
//!
//! assert_eq!(built, parsed);
//! ```

use std::fmt;

use bson::{Bson, Document};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Operators that can constrain a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// The value, or any element of an array value, is one of the candidates.
    In(Vec<Bson>),
    /// The value is greater than or equal to the bound.
    Gte(Bson),
    /// The value is less than or equal to the bound.
    Lte(Bson),
}

impl FieldOp {
    /// The database-syntax name of this operator.
    pub fn name(&self) -> &'static str {
        match self {
            FieldOp::In(_) => "$in",
            FieldOp::Gte(_) => "$gte",
            FieldOp::Lte(_) => "$lte",
        }
    }

    /// The operand rendered as a BSON value.
    pub fn operand(&self) -> Bson {
        match self {
            FieldOp::In(values) => Bson::Array(values.clone()),
            FieldOp::Gte(bound) | FieldOp::Lte(bound) => bound.clone(),
        }
    }
}

/// The constraint placed on one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The resolved value must equal the literal.
    Eq(Bson),
    /// Every operator must hold. An empty set matches anything.
    Ops(Vec<FieldOp>),
}

/// A field path paired with its condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Dotted path of the field.
    pub field: String,
    /// The constraint on the resolved value.
    pub condition: Condition,
}

/// A conjunction of field conditions, at most one per field path.
///
/// The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Vec<FieldFilter>,
}

impl Filter {
    /// Creates an empty filter matching every document.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Returns `true` if the filter has no field conditions.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The field conditions in the order they were added.
    pub fn fields(&self) -> &[FieldFilter] {
        &self.fields
    }

    /// Requires the field to equal `value`, replacing any earlier condition on the field.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.set(field.into(), Condition::Eq(value.into()));
        self
    }

    /// Requires the field (or any element of it, for arrays) to be one of `values`.
    pub fn any_of<V: Into<Bson>>(self, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        self.op(field, FieldOp::In(values.into_iter().map(Into::into).collect()))
    }

    /// Requires the field to be greater than or equal to `bound`.
    pub fn gte(self, field: impl Into<String>, bound: impl Into<Bson>) -> Self {
        self.op(field, FieldOp::Gte(bound.into()))
    }

    /// Requires the field to be less than or equal to `bound`.
    pub fn lte(self, field: impl Into<String>, bound: impl Into<Bson>) -> Self {
        self.op(field, FieldOp::Lte(bound.into()))
    }

    /// Adds an operator to the field's operator set.
    ///
    /// An equality condition already on the field is replaced.
    pub fn op(mut self, field: impl Into<String>, op: FieldOp) -> Self {
        let field = field.into();

        match self.position(&field) {
            Some(index) => match &mut self.fields[index].condition {
                Condition::Ops(ops) => ops.push(op),
                condition => *condition = Condition::Ops(vec![op]),
            },
            None => self.fields.push(FieldFilter { field, condition: Condition::Ops(vec![op]) }),
        }

        self
    }

    /// Renders the filter in database query syntax.
    pub fn to_document(&self) -> Document {
        FilterTranslator.visit_filter(self)
    }

    fn set(&mut self, field: String, condition: Condition) {
        match self.position(&field) {
            Some(index) => self.fields[index].condition = condition,
            None => self.fields.push(FieldFilter { field, condition }),
        }
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|existing| existing.field == field)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_document())
    }
}

impl TryFrom<Document> for Filter {
    type Error = DocumentStoreError;

    /// Parses a database-style filter document.
    ///
    /// A value that is a non-empty document whose keys all start with `$` is an operator
    /// set; anything else is an equality literal. Unsupported operators are skipped.
    fn try_from(document: Document) -> DocumentStoreResult<Self> {
        let mut filter = Filter::new();

        for (field, value) in document {
            let condition = match value {
                Bson::Document(operators) if is_operator_set(&operators) => {
                    Condition::Ops(parse_operators(&field, operators)?)
                },
                literal => Condition::Eq(literal),
            };

            filter.set(field, condition);
        }

        Ok(filter)
    }
}

fn is_operator_set(document: &Document) -> bool {
    !document.is_empty() && document.keys().all(|key| key.starts_with('$'))
}

fn parse_operators(field: &str, operators: Document) -> DocumentStoreResult<Vec<FieldOp>> {
    let mut ops = Vec::with_capacity(operators.len());

    for (name, operand) in operators {
        match name.as_str() {
            "$in" => match operand {
                Bson::Array(values) => ops.push(FieldOp::In(values)),
                other => {
                    return Err(DocumentStoreError::InvalidFilter(format!(
                        "$in on field {field} requires an array, got {other}"
                    )));
                },
            },
            "$gte" => ops.push(FieldOp::Gte(operand)),
            "$lte" => ops.push(FieldOp::Lte(operand)),
            unsupported => log::debug!("Ignoring unsupported operator {unsupported} on field {field}"),
        }
    }

    Ok(ops)
}

/// Traverses a [`Filter`], one callback per condition kind.
///
/// Implemented by backends that evaluate filters and by translators that render them.
pub trait FilterVisitor {
    type Output;

    fn visit_all(&mut self, fields: &[FieldFilter]) -> Self::Output;
    fn visit_eq(&mut self, field: &str, value: &Bson) -> Self::Output;
    fn visit_ops(&mut self, field: &str, ops: &[FieldOp]) -> Self::Output;

    fn visit_filter(&mut self, filter: &Filter) -> Self::Output {
        self.visit_all(filter.fields())
    }

    fn visit_field(&mut self, field: &FieldFilter) -> Self::Output {
        match &field.condition {
            Condition::Eq(value) => self.visit_eq(&field.field, value),
            Condition::Ops(ops) => self.visit_ops(&field.field, ops),
        }
    }
}

/// Renders filters back into database query documents.
struct FilterTranslator;

impl FilterVisitor for FilterTranslator {
    type Output = Document;

    fn visit_all(&mut self, fields: &[FieldFilter]) -> Self::Output {
        fields
            .iter()
            .flat_map(|field| self.visit_field(field))
            .collect()
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Self::Output {
        let mut document = Document::new();
        document.insert(field, value.clone());
        document
    }

    fn visit_ops(&mut self, field: &str, ops: &[FieldOp]) -> Self::Output {
        let mut document = Document::new();
        document.insert(
            field,
            ops
                .iter()
                .map(|op| (op.name().to_string(), op.operand()))
                .collect::<Document>(),
        );
        document
    }
}
