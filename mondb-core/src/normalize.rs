//! Identifier normalization between the public boundary and backends.
//!
//! Callers always see the identifier field as a lowercase hex string. Before a
//! filter, update or document reaches a backend the string is parsed into a
//! native [`Value::ObjectId`]; documents coming back get the reverse treatment.
//! Both directions take the document by value and hand back the normalized
//! copy, so a caller's map is never changed behind its back.

use crate::{
    document::{Document, Value},
    error::AdapterError,
    id::{DocumentId, ID_FIELD},
};

/// Replaces a hex string identifier with its native form.
///
/// Documents without the identifier field pass through unchanged. An
/// identifier that is not a string, or not a valid hex id, is rejected.
pub fn to_native(mut document: Document) -> Result<Document, AdapterError> {
    if let Some(value) = document.get_mut(ID_FIELD) {
        let id = match value {
            Value::String(hex) => DocumentId::parse_hex(hex)?,
            other => return Err(AdapterError::InvalidId(format!("{} {}", other.kind(), other))),
        };
        *value = Value::ObjectId(id);
    }

    Ok(document)
}

/// Replaces a native identifier with its hex string form.
///
/// Identifiers the backend stored in some other shape are left as they are.
pub fn to_boundary(mut document: Document) -> Document {
    if let Some(id) = document.get(ID_FIELD).and_then(Value::as_object_id) {
        document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
    }

    document
}
