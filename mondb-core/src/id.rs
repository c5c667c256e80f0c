//! Document identifiers.
//!
//! A [`DocumentId`] is the 12 byte value stored under the reserved [`ID_FIELD`].
//! At the public boundary it always travels as a 24 character lowercase hex
//! string; inside the adapter and the backends it is kept in its native form.

use std::{fmt, str::FromStr};

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::AdapterError;

/// The reserved key holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Length of the hex form of a [`DocumentId`].
pub const ID_HEX_LEN: usize = 24;

/// A 12 byte document identifier with the layout of a MongoDB ObjectId:
/// a 4 byte big-endian creation timestamp, 5 random bytes and a 3 byte counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Generates a fresh identifier stamped with the current time.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(ObjectId::from_bytes(bytes))
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0.bytes()
    }

    /// Parses the boundary form of an identifier.
    ///
    /// Only exactly [`ID_HEX_LEN`] lowercase hex characters are accepted;
    /// anything else is reported as [`AdapterError::InvalidId`].
    pub fn parse_hex(hex: &str) -> Result<Self, AdapterError> {
        if hex.len() != ID_HEX_LEN || hex.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(AdapterError::InvalidId(hex.to_string()));
        }

        ObjectId::parse_str(hex)
            .map(Self)
            .map_err(|_| AdapterError::InvalidId(hex.to_string()))
    }

    /// Renders the boundary form of this identifier.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// The creation time embedded in the first four bytes.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.0.timestamp().to_chrono()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<DocumentId> for ObjectId {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::parse_hex(&hex).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "5f1b2c3d4e5f60718293a4b5";

    #[test]
    fn parses_and_renders_lowercase_hex() {
        let id = DocumentId::parse_hex(HEX).unwrap();

        assert_eq!(id.to_hex(), HEX);
        assert_eq!(id.to_string(), HEX);
        assert_eq!(id.bytes()[0], 0x5f);
        assert_eq!(id.bytes()[11], 0xb5);
        assert_eq!(DocumentId::from_bytes(id.bytes()), id);
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in [
            "",
            "not-a-hex-id",
            "5f1b2c3d4e5f60718293a4b",
            "5f1b2c3d4e5f60718293a4b5c",
            "5F1B2C3D4E5F60718293A4B5",
            "5f1b2c3d4e5f60718293a4bz",
            "5f1b2c3d4e5f60718293a4é",
        ] {
            assert_eq!(
                DocumentId::parse_hex(bad),
                Err(AdapterError::InvalidId(bad.to_string())),
                "accepted {bad:?}",
            );
        }
    }

    #[test]
    fn converts_to_and_from_object_id() {
        let oid = ObjectId::new();
        let id = DocumentId::from(oid);

        assert_eq!(id.to_hex(), oid.to_hex());
        assert_eq!(ObjectId::from(id), oid);
    }

    #[test]
    fn generated_ids_are_unique_and_recent() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();

        assert_ne!(a, b);
        assert!((Utc::now() - a.timestamp()).num_seconds() < 60);
    }

    #[test]
    fn serializes_as_hex_string() {
        let id: DocumentId = HEX.parse().unwrap();

        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(HEX));
        assert_eq!(serde_json::from_value::<DocumentId>(serde_json::json!(HEX)).unwrap(), id);
        assert!(serde_json::from_value::<DocumentId>(serde_json::json!("xyz")).is_err());
    }
}
