//! Conversion between mondb values and BSON.
//!
//! Documents cross the driver boundary here in both directions. Integers that
//! fit 32 bits are written as `Int32` so stored numbers look the same as ones
//! written by other drivers, and both integer widths read back as
//! [`Value::Int`].

use bson::Bson;
use mondb_core::document::{Document, Value};


/// Converts documents and values between mondb's model and BSON.
///
/// BSON kinds with no counterpart in [`Value`] (binary data, regular
/// expressions, decimals, timestamps and the like) are read back as their
/// string rendering. They are never produced on the way in.
pub(crate) struct BsonConverter;

impl BsonConverter {
    /// Recursively converts a value to BSON.
    pub(crate) fn to_bson(value: Value) -> Bson {
        match value {
            Value::Null => Bson::Null,
            Value::Bool(b) => Bson::Boolean(b),
            Value::Int(i) => i32::try_from(i)
                .map(Bson::Int32)
                .unwrap_or(Bson::Int64(i)),
            Value::Float(f) => Bson::Double(f),
            Value::String(s) => Bson::String(s),
            Value::Array(items) => Bson::Array(
                items
                    .into_iter()
                    .map(Self::to_bson)
                    .collect(),
            ),
            Value::Document(doc) => Bson::Document(Self::to_document(doc)),
            Value::ObjectId(id) => Bson::ObjectId(id.into()),
            Value::DateTime(dt) => Bson::DateTime(bson::DateTime::from_chrono(dt)),
        }
    }

    /// Recursively converts BSON to a value, flattening nested arrays and
    /// documents into plain [`Value::Array`] and [`Value::Document`].
    pub(crate) fn from_bson(bson: Bson) -> Value {
        match bson {
            Bson::Null | Bson::Undefined => Value::Null,
            Bson::Boolean(b) => Value::Bool(b),
            Bson::Int32(i) => Value::Int(i.into()),
            Bson::Int64(i) => Value::Int(i),
            Bson::Double(f) => Value::Float(f),
            Bson::String(s) => Value::String(s),
            Bson::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Self::from_bson)
                    .collect(),
            ),
            Bson::Document(doc) => Value::Document(Self::from_document(doc)),
            Bson::ObjectId(oid) => Value::ObjectId(oid.into()),
            Bson::DateTime(dt) => Value::DateTime(dt.to_chrono()),
            other => Value::String(other.to_string()),
        }
    }

    pub(crate) fn to_document(document: Document) -> bson::Document {
        document
            .into_iter()
            .map(|(key, value)| (key, Self::to_bson(value)))
            .collect()
    }

    pub(crate) fn from_document(document: bson::Document) -> Document {
        document
            .into_iter()
            .map(|(key, value)| (key, Self::from_bson(value)))
            .collect()
    }
}
