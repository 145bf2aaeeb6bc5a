//! Filter evaluation against in-memory documents.
//!
//! This module provides the matching engine behind every read and update: each
//! field condition resolves its dotted path and compares the result through
//! [`Comparable`], which gives BSON values total, panic-free comparison rules.

use std::{cmp::Ordering, collections::HashMap};

use bson::{Bson, DateTime, Document};

use docshim_core::{
    path::PathResolver,
    query::{FieldFilter, FieldOp, Filter, FilterVisitor},
};

/// Comparable representation of BSON values.
///
/// Integers of either width compare exactly as i64; an integer and a double compare
/// by exact numeric value, so `Int32(18)`, `Int64(18)` and `Double(18.0)` are equal
/// while `2^53` and `2^53 + 1` stay distinct. Values of different kinds are never
/// ordered against each other.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (Int32 and Int64 widened to i64)
    Int(i64),
    /// Floating point value
    Double(f64),
    /// DateTime value
    DateTime(DateTime),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Any other BSON value, compared structurally and never ordered
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Double(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(_) | Comparable::Double(_), Comparable::Int(_) | Comparable::Double(_)) => {
                self.partial_cmp(other) == Some(Ordering::Equal)
            },
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Int(a), Comparable::Int(b)) => a.partial_cmp(b),
            (Comparable::Double(a), Comparable::Double(b)) => a.partial_cmp(b),
            (Comparable::Int(a), Comparable::Double(b)) => cmp_int_double(*a, *b),
            (Comparable::Double(a), Comparable::Int(b)) => cmp_int_double(*b, *a).map(Ordering::reverse),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl<'a> Comparable<'a> {
    /// Returns `true` for values that can be grouped on.
    pub(crate) fn is_scalar(&self) -> bool {
        !matches!(self, Comparable::Array(_) | Comparable::Map(_) | Comparable::Other(_))
    }

    /// Total order across scalar kinds: null, numbers, strings, booleans, then dates.
    ///
    /// NaN sorts before every other number and equals itself.
    pub(crate) fn total_cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| match (self.is_nan(), other.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => self.partial_cmp(other).unwrap_or(Ordering::Equal),
            })
    }

    fn is_nan(&self) -> bool {
        matches!(self, Comparable::Double(value) if value.is_nan())
    }

    fn rank(&self) -> u8 {
        match self {
            Comparable::Null => 0,
            Comparable::Int(_) | Comparable::Double(_) => 1,
            Comparable::String(_) => 2,
            Comparable::Bool(_) => 3,
            Comparable::DateTime(_) => 4,
            Comparable::Map(_) => 5,
            Comparable::Array(_) => 6,
            Comparable::Other(_) => 7,
        }
    }
}

/// Compares an integer with a double by exact value.
///
/// The double is split at its integral part, which converts to i64 without loss inside
/// the i64 range; values outside that range order against every i64 directly.
fn cmp_int_double(int: i64, double: f64) -> Option<Ordering> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if double.is_nan() {
        return None;
    }
    if double >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if double < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }

    let integral = double.trunc();
    Some(int.cmp(&(integral as i64)).then_with(|| {
        // the integral parts are equal, so the fractional part decides
        0.0f64.partial_cmp(&(double - integral)).unwrap_or(Ordering::Equal)
    }))
}

/// Evaluates a [`Filter`] against one document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
    resolver: PathResolver,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document, resolver: PathResolver) -> Self {
        Self { document, resolver }
    }

    pub fn matches(&mut self, filter: &Filter) -> bool {
        self.visit_filter(filter)
    }

    fn resolve(&self, field: &str) -> Option<Comparable<'a>> {
        self.resolver
            .resolve(self.document, field)
            .map(Comparable::from)
    }
}

impl<'a> FilterVisitor for DocumentEvaluator<'a> {
    type Output = bool;

    fn visit_all(&mut self, fields: &[FieldFilter]) -> Self::Output {
        fields
            .iter()
            .all(|field| self.visit_field(field))
    }

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Self::Output {
        match self.resolve(field) {
            Some(actual) => actual == Comparable::from(value),
            None => false,
        }
    }

    fn visit_ops(&mut self, field: &str, ops: &[FieldOp]) -> Self::Output {
        let actual = self.resolve(field);

        ops.iter().all(|op| match (&actual, op) {
            (None, _) => false,
            (Some(actual), FieldOp::In(candidates)) => match actual {
                Comparable::Array(items) => items
                    .iter()
                    .any(|item| candidates.iter().any(|candidate| *item == Comparable::from(candidate))),
                single_value => candidates
                    .iter()
                    .any(|candidate| *single_value == Comparable::from(candidate)),
            },
            (Some(actual), FieldOp::Gte(bound)) => actual
                .partial_cmp(&Comparable::from(bound))
                .is_some_and(Ordering::is_ge),
            (Some(actual), FieldOp::Lte(bound)) => actual
                .partial_cmp(&Comparable::from(bound))
                .is_some_and(Ordering::is_le),
        })
    }
}
