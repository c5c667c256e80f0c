//! Main mondb crate providing a minimal adapter over a document database.
//!
//! This crate is the primary entry point for users of mondb. It re-exports the
//! core types from the sub-crates and provides access to the storage backends.
//!
//! # Features
//!
//! - **One small contract** - Connect, find one or many, insert, update by merge, delete
//! - **Hex identifiers** - Callers see `_id` as a 24 character lowercase hex string
//! - **Bounded operations** - Every call runs under a per-handle deadline
//! - **Substitutable backends** - In-memory and MongoDB storage behind the same trait
//!
//! # Quick Start
//!
//! ```ignore
//! use mondb::{prelude::*, memory::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = MemoryStore::new("numbers", "testing");
//!     store.connect("memory://local").await?;
//!
//!     store.insert_one(Some(document! { "name" => "pi", "value" => 3.14159 })).await?;
//!
//!     let pi = store.find_one(document! { "name" => "pi" }).await?;
//!     let id = pi["_id"].as_str().unwrap_or_default();
//!
//!     store.update_one(document! { "_id" => id }, Some(document! { "value" => 500 })).await?;
//!     store.delete_one(document! { "_id" => id }).await?;
//!
//!     match store.find_one(document! { "name" => "pi" }).await {
//!         Err(err) if err.is_not_found() => println!("pi is gone"),
//!         other => println!("unexpected: {other:?}"),
//!     }
//!
//!     store.disconnect().await;
//!     Ok(())
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! `DocumentStore` is object safe, so the backend can be picked at runtime as
//! long as the error type is fixed:
//!
//! ```ignore
//! use mondb::{prelude::*, memory::{MemoryError, MemoryStore}};
//!
//! let store: Box<dyn DocumentStore<Error = MemoryError>> =
//!     Box::new(MemoryStore::new("numbers", "testing"));
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use mondb_core::{backend, config, deadline, document, error, id, normalize, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use mondb_memory::{MEMORY_SCHEME, MemoryBackend, MemoryConnector, MemoryError, MemoryStore};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use mondb_mongodb::{DEFAULT_MONGO_URL, MongoBackend, MongoConnector, MongoError, MongoStore};
}
