//! Filter evaluation for in-memory document matching.
//!
//! Filters are equality constraints: every `field => value` pair must match
//! the document. Field names may be dotted paths into nested documents. A
//! field holding an array matches when any element equals the filter value,
//! and a missing field matches `null`. Query operators are not evaluated.

use std::collections::BTreeMap;

use mondb_core::{
    document::{Document, Value},
    id::DocumentId,
};

use crate::store::MemoryError;

/// Comparable view of a document value.
///
/// Integers and floats are normalized to `f64` so `3` and `3.0` compare equal,
/// matching how a document database compares numbers in filters.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    ObjectId(DocumentId),
    /// Microseconds since the epoch
    DateTime(i64),
    Array(Vec<Comparable<'a>>),
    Map(BTreeMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Value> for Comparable<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => Comparable::Null,
            Value::Bool(b) => Comparable::Bool(*b),
            Value::Int(i) => Comparable::Number(*i as f64),
            Value::Float(f) => Comparable::Number(*f),
            Value::String(s) => Comparable::String(s),
            Value::ObjectId(id) => Comparable::ObjectId(*id),
            Value::DateTime(dt) => Comparable::DateTime(dt.timestamp_micros()),
            Value::Array(items) => Comparable::Array(
                items
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Value::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<BTreeMap<_, _>>()
            ),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

/// Evaluates equality filters against a single document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Returns whether the document satisfies every constraint in `filter`.
    pub fn evaluate(&self, filter: &Document) -> Result<bool, MemoryError> {
        for (path, expected) in filter {
            reject_operators(path, expected)?;

            if !self.field_matches(path, expected) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn field_matches(&self, path: &str, expected: &Value) -> bool {
        let expected = Comparable::from(expected);

        match lookup(self.document, path) {
            None => expected == Comparable::Null,
            Some(actual @ Value::Array(items)) => {
                Comparable::from(actual) == expected
                    || items.iter().any(|item| Comparable::from(item) == expected)
            }
            Some(actual) => Comparable::from(actual) == expected,
        }
    }

    /// Returns the position of the first document in `documents` matching `filter`.
    pub fn position(documents: &[Document], filter: &Document) -> Result<Option<usize>, MemoryError> {
        validate_filter(filter)?;

        Ok(
            documents
                .iter()
                .position(|doc| {
                    DocumentEvaluator::new(doc)
                        .evaluate(filter)
                        .unwrap_or(false)
                })
        )
    }

    /// Returns clones of every document in `documents` matching `filter`, in order.
    pub fn filter_documents(documents: &[Document], filter: &Document) -> Result<Vec<Document>, MemoryError> {
        validate_filter(filter)?;

        Ok(
            documents
                .iter()
                .filter(|doc| {
                    DocumentEvaluator::new(doc)
                        .evaluate(filter)
                        .unwrap_or(false)
                })
                .cloned()
                .collect::<Vec<_>>()
        )
    }
}

fn validate_filter(filter: &Document) -> Result<(), MemoryError> {
    filter
        .iter()
        .try_for_each(|(path, expected)| reject_operators(path, expected))
}

/// Operators such as `$or` or `{ "$gt": 3 }` belong to a real query engine.
fn reject_operators(path: &str, expected: &Value) -> Result<(), MemoryError> {
    if path.starts_with('$') {
        return Err(MemoryError::UnsupportedOperator(path.to_string()));
    }

    if let Some(operator) = expected
        .as_document()
        .and_then(|doc| doc.keys().find(|key| key.starts_with('$')))
    {
        return Err(MemoryError::UnsupportedOperator(operator.clone()));
    }

    Ok(())
}

/// Resolves a dotted path through nested documents.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = current.as_document()?.get(segment)?;
    }

    Some(current)
}

/// Sets the value at a dotted path, creating intermediate documents as needed.
///
/// Returns whether the stored value changed. Values are compared exactly, so
/// replacing `3` with `3.0` counts as a change.
pub(crate) fn assign(document: &mut Document, path: &str, value: Value) -> Result<bool, MemoryError> {
    match path.split_once('.') {
        None => {
            let changed = document.get(path) != Some(&value);
            document.insert(path.to_string(), value);
            Ok(changed)
        }
        Some((head, rest)) => {
            let child = document
                .entry(head.to_string())
                .or_insert_with(|| Value::Document(Document::new()));

            match child.as_document_mut() {
                Some(nested) => assign(nested, rest, value),
                None => Err(MemoryError::PathConflict(path.to_string())),
            }
        }
    }
}
