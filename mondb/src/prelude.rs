//! Convenient re-exports of commonly used types from mondb.
//!
//! ```ignore
//! use mondb::prelude::*;
//! ```
//!
//! This provides access to:
//! - The store contract and its generic handle
//! - Documents, values and identifiers
//! - Configuration and error types

pub use mondb_core::{
    document,
    store::{DocumentStore, StoreHandle},
    document::{Document, Value},
    id::{DocumentId, ID_FIELD},
    config::{StoreConfig, StoreConfigBuilder, DEFAULT_TIMEOUT},
    backend::{Connector, StoreBackend, UpdateOutcome},
    error::{AdapterError, StoreError, StoreResult, DeadlineExceeded},
};

#[cfg(feature = "mongodb")]
pub use mondb_mongodb::DEFAULT_MONGO_URL;
