//! MongoDB backend implementation for mondb.
//!
//! This crate provides the MongoDB-based implementation of the `Connector` and
//! `StoreBackend` traits. Filters and updates are handed to the server as-is,
//! so the full MongoDB query language is available to callers.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mondb = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Bounded connects** - Server selection gives up after twice the operation timeout
//! - **Primary pings** - Connecting verifies the primary is reachable before any work
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
//!     store.disconnect().await;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mondb_mongodb;

pub mod store;
mod convert;

pub use store::{DEFAULT_MONGO_URL, MongoBackend, MongoConnector, MongoError, MongoStore};
