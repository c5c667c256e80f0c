//! The document store contract and its generic adapter.
//!
//! [`DocumentStore`] is the backend-independent contract callers program
//! against. [`StoreHandle`] implements it for any [`Connector`]: it enforces
//! the connection precondition, normalizes identifiers, bounds each backend
//! call by a deadline and maps the backend's "nothing there" outcomes into
//! [`AdapterError`]s. Everything else the backend reports is handed back
//! untouched as [`StoreError::Backend`].
//!
//! # Example
//!
//! ```ignore
//! use mondb::{prelude::*, memory::MemoryStore};
//!
//! let mut store = MemoryStore::new("numbers", "testing");
//! store.connect("memory://local").await?;
//! store.insert_one(Some(document! { "name" => "pi", "value" => 3.14159 })).await?;
//! let pi = store.find_one(document! { "name" => "pi" }).await?;
//! store.disconnect().await;
//! ```

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use futures::TryStreamExt;
use tracing::{debug, info, warn};

use crate::{
    backend::{Connector, StoreBackend},
    config::StoreConfig,
    deadline,
    document::Document,
    error::{AdapterError, StoreError, StoreResult},
    normalize,
};

/// Uniform CRUD contract over a schemaless document collection.
///
/// Every data operation fails with [`AdapterError::NotConnected`] until
/// [`connect`](DocumentStore::connect) has succeeded. Identifier fields are
/// exchanged as 24 character lowercase hex strings in both directions.
///
/// An `_id` in a filter, update or document must be that hex string. Any
/// other value, including a native [`DocumentId`](crate::id::DocumentId),
/// fails with [`AdapterError::InvalidId`]; pass [`DocumentId::to_hex`](crate::id::DocumentId::to_hex)
/// instead.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The backend's native error type, surfaced through [`StoreError::Backend`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Connects to `url` and verifies the primary is reachable.
    ///
    /// Connecting a handle that is already connected replaces the live
    /// connection without closing it first.
    async fn connect(&mut self, url: &str) -> StoreResult<(), Self::Error>;

    /// Closes the connection, if any. Failures while closing are logged, not returned.
    async fn disconnect(&mut self);

    /// Returns the first document matching `filter`.
    ///
    /// Fails with [`AdapterError::DocumentNotFound`] when nothing matches.
    async fn find_one(&self, filter: Document) -> StoreResult<Document, Self::Error>;

    /// Returns every document matching `filter`.
    ///
    /// An empty result is reported as [`AdapterError::DocumentNotFound`], not
    /// as an empty vector.
    async fn find_many(&self, filter: Document) -> StoreResult<Vec<Document>, Self::Error>;

    /// Inserts a document. Without an identifier field the backend assigns one.
    ///
    /// Fails with [`AdapterError::EmptyObject`] when `document` is `None`.
    async fn insert_one(&self, document: Option<Document>) -> StoreResult<(), Self::Error>;

    /// Sets the fields of `update` on the first document matching `filter`,
    /// leaving its other fields in place.
    ///
    /// Returns `true` only if a field actually changed. Fails with
    /// [`AdapterError::EmptyObject`] when `update` is `None`.
    async fn update_one(
        &self,
        filter: Document,
        update: Option<Document>,
    ) -> StoreResult<bool, Self::Error>;

    /// Deletes at most one document matching `filter`.
    ///
    /// Returns `true` only if a document was removed; no match is not an error.
    async fn delete_one(&self, filter: Document) -> StoreResult<bool, Self::Error>;
}

#[async_trait]
impl<S> DocumentStore for Box<S>
where
    S: DocumentStore + ?Sized,
{
    type Error = S::Error;

    async fn connect(&mut self, url: &str) -> StoreResult<(), Self::Error> {
        (**self).connect(url).await
    }

    async fn disconnect(&mut self) {
        (**self).disconnect().await
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Document, Self::Error> {
        (**self).find_one(filter).await
    }

    async fn find_many(&self, filter: Document) -> StoreResult<Vec<Document>, Self::Error> {
        (**self).find_many(filter).await
    }

    async fn insert_one(&self, document: Option<Document>) -> StoreResult<(), Self::Error> {
        (**self).insert_one(document).await
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Option<Document>,
    ) -> StoreResult<bool, Self::Error> {
        (**self).update_one(filter, update).await
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<bool, Self::Error> {
        (**self).delete_one(filter).await
    }
}

/// The error type produced by a connector's backend.
pub type BackendError<C> = <<C as Connector>::Backend as StoreBackend>::Error;

/// A store handle: target location, timeout and an optional live connection.
///
/// The handle exclusively owns its connection. Data operations take `&self`
/// and may run concurrently; connecting and disconnecting take `&mut self`.
#[derive(Debug)]
pub struct StoreHandle<C: Connector> {
    connector: C,
    config: StoreConfig,
    backend: Option<C::Backend>,
}

impl<C: Connector + Default> StoreHandle<C> {
    /// Creates a disconnected handle with the default five second timeout.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self::from_config(C::default(), StoreConfig::new(database, collection))
    }

    /// Creates a disconnected handle with an explicit per-operation timeout.
    pub fn with_timeout(
        database: impl Into<String>,
        collection: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self::from_config(
            C::default(),
            StoreConfig::builder(database, collection)
                .timeout(timeout)
                .build(),
        )
    }
}

impl<C: Connector> StoreHandle<C> {
    /// Creates a disconnected handle around an existing connector.
    pub fn from_config(connector: C, config: StoreConfig) -> Self {
        Self {
            connector,
            config,
            backend: None,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    fn backend(&self) -> StoreResult<&C::Backend, BackendError<C>> {
        self.backend
            .as_ref()
            .ok_or(StoreError::Adapter(AdapterError::NotConnected))
    }

    /// Runs a backend call under the per-operation deadline.
    async fn bounded<T, F>(&self, fut: F) -> StoreResult<T, BackendError<C>>
    where
        F: Future<Output = Result<T, BackendError<C>>>,
    {
        deadline::within(self.config.timeout, fut)
            .await
            .map_err(StoreError::Backend)
    }
}

#[async_trait]
impl<C: Connector> DocumentStore for StoreHandle<C> {
    type Error = BackendError<C>;

    async fn connect(&mut self, url: &str) -> StoreResult<(), Self::Error> {
        let limit = self.config.connect_timeout();

        info!(
            database = %self.config.database,
            collection = %self.config.collection,
            "connecting to document store"
        );

        let backend = deadline::within(limit, self.connector.connect(url, &self.config))
            .await
            .map_err(StoreError::Backend)?;

        deadline::within(limit, backend.ping())
            .await
            .map_err(StoreError::Backend)?;

        if self.backend.replace(backend).is_some() {
            warn!("replaced a live connection without closing it");
        }

        info!(database = %self.config.database, "connected to document store");

        Ok(())
    }

    async fn disconnect(&mut self) {
        let Some(backend) = self.backend.take() else {
            return;
        };

        match deadline::within(self.config.timeout, backend.close()).await {
            Ok(()) => info!(database = %self.config.database, "disconnected from document store"),
            Err(err) => warn!(error = %err, "failed to close document store connection"),
        }
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Document, Self::Error> {
        let backend = self.backend()?;
        let filter = normalize::to_native(filter)?;

        debug!(collection = %self.config.collection, fields = filter.len(), "find one");

        self.bounded(backend.find_one(filter))
            .await?
            .map(normalize::to_boundary)
            .ok_or(StoreError::Adapter(AdapterError::DocumentNotFound))
    }

    async fn find_many(&self, filter: Document) -> StoreResult<Vec<Document>, Self::Error> {
        let backend = self.backend()?;
        let filter = normalize::to_native(filter)?;

        debug!(collection = %self.config.collection, fields = filter.len(), "find many");

        let stream = self.bounded(backend.find(filter)).await?;
        let documents = self
            .bounded(stream.try_collect::<Vec<_>>())
            .await?;

        if documents.is_empty() {
            return Err(AdapterError::DocumentNotFound.into());
        }

        Ok(
            documents
                .into_iter()
                .map(normalize::to_boundary)
                .collect()
        )
    }

    async fn insert_one(&self, document: Option<Document>) -> StoreResult<(), Self::Error> {
        let backend = self.backend()?;
        let document = normalize::to_native(document.ok_or(AdapterError::EmptyObject)?)?;

        debug!(collection = %self.config.collection, fields = document.len(), "insert one");

        self.bounded(backend.insert_one(document)).await
    }

    async fn update_one(
        &self,
        filter: Document,
        update: Option<Document>,
    ) -> StoreResult<bool, Self::Error> {
        let backend = self.backend()?;
        let update = update.ok_or(AdapterError::EmptyObject)?;
        let filter = normalize::to_native(filter)?;
        let update = normalize::to_native(update)?;

        debug!(collection = %self.config.collection, fields = update.len(), "update one");

        let outcome = self.bounded(backend.update_one(filter, update)).await?;

        Ok(outcome.modified > 0)
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<bool, Self::Error> {
        let backend = self.backend()?;
        let filter = normalize::to_native(filter)?;

        debug!(collection = %self.config.collection, fields = filter.len(), "delete one");

        Ok(self.bounded(backend.delete_one(filter)).await? > 0)
    }
}
