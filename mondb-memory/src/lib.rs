//! In-memory document storage backend for mondb.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `Connector` and `StoreBackend` traits. It stands in for a real database in
//! development and tests: any code written against the `DocumentStore`
//! contract runs unchanged on top of it.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Equality filters** - Top-level and dotted-path equality with numeric coercion
//! - **Partial updates** - Field merges that report whether anything changed
//! - **Latency injection** - Delay every call to exercise deadline handling
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
//!     let pi = store.find_one(document! { "name" => "pi" }).await?;
//!     assert_eq!(pi["_id"].as_str().map(str::len), Some(24));
//!
//!     store.disconnect().await;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mondb_memory;

pub mod store;
mod evaluator;

pub use store::{MEMORY_SCHEME, MemoryBackend, MemoryConnector, MemoryError};

use mondb_core::store::StoreHandle;

/// A store handle backed by in-process memory.
pub type MemoryStore = StoreHandle<MemoryConnector>;
