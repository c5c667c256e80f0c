//! A minimal document store access adapter.
//!
//! This crate is the core of the mondb project and provides:
//!
//! - **Documents** ([`document`]) - Schemaless documents and their tagged value type
//! - **Identifiers** ([`id`]) - The reserved `_id` field and its hex boundary form
//! - **Store contract** ([`store`]) - The backend-independent CRUD contract and the generic handle implementing it
//! - **Backend abstraction** ([`backend`]) - Traits a database driver implements to sit behind the handle
//! - **Normalization** ([`normalize`]) - Identifier translation between callers and backends
//! - **Deadlines** ([`deadline`]) - Per-operation timeout scoping
//! - **Configuration** ([`config`]) - Database, collection and timeout settings
//! - **Error handling** ([`error`]) - The adapter error vocabulary and result types
//!
//! # Example
//!
//! ```ignore
//! use mondb::{prelude::*, mongodb::MongoStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = MongoStore::new("numbers", "testing");
//!     store.connect(DEFAULT_MONGO_URL).await?;
//!
//!     store.insert_one(Some(document! { "name" => "pi", "value" => 3.14159 })).await?;
//!     let pi = store.find_one(document! { "name" => "pi" }).await?;
//!     println!("{}", pi["_id"]);
//!
//!     store.disconnect().await;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mondb_core;

pub mod backend;
pub mod config;
pub mod deadline;
pub mod document;
pub mod error;
pub mod id;
pub mod normalize;
pub mod store;
