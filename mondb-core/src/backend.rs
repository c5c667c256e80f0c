//! Storage backend abstraction for the document store.
//!
//! This module defines the seam between the adapter logic in
//! [`StoreHandle`](crate::store::StoreHandle) and a concrete database driver.
//! Backends only ever see documents whose identifier field has already been
//! normalized to [`Value::ObjectId`](crate::document::Value::ObjectId), and they
//! report failures with their own error type, which the handle passes through
//! unmodified.
//!
//! # Traits
//!
//! - [`Connector`]: Factory that establishes a backend connection for a url
//! - [`StoreBackend`]: A live connection bound to one database and collection

use std::fmt::Debug;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{config::StoreConfig, document::Document, error::DeadlineExceeded};

/// A stream of documents produced by [`StoreBackend::find`].
pub type DocumentStream<E> = BoxStream<'static, Result<Document, E>>;

/// What an update did to the matched document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of documents that matched the filter.
    pub matched: u64,
    /// Number of documents whose content actually changed.
    pub modified: u64,
}

/// Establishes connections to a backend.
///
/// A connector holds whatever driver-level state outlives a single connection
/// (for the in-memory backend, the data itself).
#[async_trait]
pub trait Connector: Send + Sync + Debug {
    type Backend: StoreBackend;

    /// Opens a connection to `url` targeting the database and collection named
    /// in `config`.
    ///
    /// The handle bounds this call by twice the configured timeout and then
    /// calls [`StoreBackend::ping`] under a separate deadline, so
    /// implementations need not verify liveness here.
    async fn connect(
        &self,
        url: &str,
        config: &StoreConfig,
    ) -> Result<Self::Backend, <Self::Backend as StoreBackend>::Error>;
}

/// A live backend connection scoped to one collection.
///
/// Implementations must be safe to share between concurrent operations; the
/// handle applies no locking of its own.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// The backend's native error type. A deadline overrun is reported
    /// through it as well.
    type Error: std::error::Error + From<DeadlineExceeded> + Send + Sync + 'static;

    /// Checks that the primary server is reachable.
    async fn ping(&self) -> Result<(), Self::Error>;

    /// Returns the first document matching `filter`, if any.
    async fn find_one(&self, filter: Document) -> Result<Option<Document>, Self::Error>;

    /// Dispatches a query for every document matching `filter`.
    ///
    /// The returned stream is drained separately so that dispatch and
    /// materialization can be given independent deadlines.
    async fn find(&self, filter: Document) -> Result<DocumentStream<Self::Error>, Self::Error>;

    /// Inserts one document. If it has no identifier the backend assigns one.
    async fn insert_one(&self, document: Document) -> Result<(), Self::Error>;

    /// Merges the fields of `set` into the first document matching `filter`.
    async fn update_one(&self, filter: Document, set: Document) -> Result<UpdateOutcome, Self::Error>;

    /// Removes at most one document matching `filter`, returning how many were removed.
    async fn delete_one(&self, filter: Document) -> Result<u64, Self::Error>;

    /// Closes the connection, releasing driver resources.
    async fn close(self) -> Result<(), Self::Error>
    where
        Self: Sized,
    {
        Ok(())
    }
}
