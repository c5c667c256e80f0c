//! In-memory storage implementation of the backend traits.
//!
//! Documents live in vectors keyed by database and collection name, guarded by
//! an async-aware read-write lock. Every connection made by one
//! [`MemoryConnector`] shares the same data.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::stream;
use mea::rwlock::RwLock;
use thiserror::Error;
use tracing::debug;

use mondb_core::{
    backend::{Connector, DocumentStream, StoreBackend, UpdateOutcome},
    config::StoreConfig,
    document::{Document, Value},
    error::DeadlineExceeded,
    id::{DocumentId, ID_FIELD},
};

use crate::evaluator::{DocumentEvaluator, assign};

/// Url scheme accepted by [`MemoryConnector::connect`].
pub const MEMORY_SCHEME: &str = "memory://";

type CollectionMap = HashMap<String, Vec<Document>>;
type StoreMap = HashMap<String, CollectionMap>;

/// Errors reported by the in-memory backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    /// The connection url does not use the `memory://` scheme.
    #[error("Invalid memory store url: {0}")]
    InvalidUrl(String),
    /// A document with the same identifier already exists.
    /// The first argument is the identifier, the second is the collection name.
    #[error("Duplicate key: document {0} already exists in collection {1}")]
    DuplicateKey(String, String),
    /// The filter or update uses a query operator this backend does not evaluate.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// An update tried to change a document's identifier.
    #[error("Performing an update on the path '_id' would modify the immutable field '_id'")]
    ImmutableId,
    /// An update with no fields to set.
    #[error("Update document must not be empty")]
    EmptyUpdate,
    /// A dotted update path runs through a field that is not a document.
    #[error("Cannot create field along path {0}")]
    PathConflict(String),
    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}

/// Thread-safe in-memory document storage.
///
/// Cloning a connector shares the underlying data, so a test can keep one
/// clone for inspection while a store handle owns another.
///
/// # Example
///
/// ```ignore
/// use mondb::{prelude::*, memory::MemoryStore};
///
/// let mut store = MemoryStore::new("numbers", "testing");
/// store.connect("memory://local").await?;
/// ```
#[derive(Default, Clone, Debug)]
pub struct MemoryConnector {
    store: Arc<RwLock<StoreMap>>,
    latency: Option<Duration>,
}

impl MemoryConnector {
    /// Creates a connector over an empty store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            latency: None,
        }
    }

    /// Delays every backend call by `latency`, to exercise deadlines.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns the raw stored documents of a collection, with identifiers in
    /// their native form.
    pub async fn snapshot(&self, database: &str, collection: &str) -> Vec<Document> {
        self.store
            .read()
            .await
            .get(database)
            .and_then(|collections| collections.get(collection))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    type Backend = MemoryBackend;

    async fn connect(&self, url: &str, config: &StoreConfig) -> Result<MemoryBackend, MemoryError> {
        if !url.starts_with(MEMORY_SCHEME) {
            return Err(MemoryError::InvalidUrl(url.to_string()));
        }

        Ok(MemoryBackend {
            store: self.store.clone(),
            database: config.database.clone(),
            collection: config.collection.clone(),
            latency: self.latency,
        })
    }
}

/// A connection to one collection of a [`MemoryConnector`]'s data.
#[derive(Debug)]
pub struct MemoryBackend {
    store: Arc<RwLock<StoreMap>>,
    database: String,
    collection: String,
    latency: Option<Duration>,
}

impl MemoryBackend {
    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn documents<'a>(&self, store: &'a StoreMap) -> &'a [Document] {
        store
            .get(&self.database)
            .and_then(|collections| collections.get(&self.collection))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn documents_mut<'a>(&self, store: &'a mut StoreMap) -> &'a mut Vec<Document> {
        store
            .entry(self.database.clone())
            .or_default()
            .entry(self.collection.clone())
            .or_default()
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    type Error = MemoryError;

    async fn ping(&self) -> Result<(), MemoryError> {
        self.delay().await;
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, MemoryError> {
        self.delay().await;

        let store = self.store.read().await;
        let documents = self.documents(&store);

        Ok(
            DocumentEvaluator::position(documents, &filter)?
                .map(|index| documents[index].clone())
        )
    }

    async fn find(&self, filter: Document) -> Result<DocumentStream<MemoryError>, MemoryError> {
        self.delay().await;

        let matched = {
            let store = self.store.read().await;
            DocumentEvaluator::filter_documents(self.documents(&store), &filter)?
        };

        Ok(Box::pin(stream::iter(matched.into_iter().map(Ok))))
    }

    async fn insert_one(&self, mut document: Document) -> Result<(), MemoryError> {
        self.delay().await;

        let id = document
            .entry(ID_FIELD.to_string())
            .or_insert_with(|| Value::ObjectId(DocumentId::generate()))
            .clone();

        let mut store = self.store.write().await;
        let documents = self.documents_mut(&mut store);

        if documents.iter().any(|doc| doc.get(ID_FIELD) == Some(&id)) {
            let key = id
                .as_object_id()
                .map(|oid| oid.to_hex())
                .unwrap_or_else(|| id.to_string());
            return Err(MemoryError::DuplicateKey(key, self.collection.clone()));
        }

        debug!(collection = %self.collection, id = %id, "inserted document");
        documents.push(document);

        Ok(())
    }

    async fn update_one(&self, filter: Document, set: Document) -> Result<UpdateOutcome, MemoryError> {
        self.delay().await;

        if set.is_empty() {
            return Err(MemoryError::EmptyUpdate);
        }
        if let Some(operator) = set.keys().find(|key| key.starts_with('$')) {
            return Err(MemoryError::UnsupportedOperator(operator.clone()));
        }

        let mut store = self.store.write().await;
        let documents = self.documents_mut(&mut store);

        let Some(index) = DocumentEvaluator::position(documents, &filter)? else {
            return Ok(UpdateOutcome::default());
        };

        if set
            .get(ID_FIELD)
            .is_some_and(|id| documents[index].get(ID_FIELD) != Some(id))
        {
            return Err(MemoryError::ImmutableId);
        }

        // Apply to a copy so a failing path leaves the stored document intact.
        let mut updated = documents[index].clone();
        let mut modified = false;
        for (path, value) in set {
            modified |= assign(&mut updated, &path, value)?;
        }
        documents[index] = updated;

        Ok(UpdateOutcome {
            matched: 1,
            modified: modified.into(),
        })
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, MemoryError> {
        self.delay().await;

        let mut store = self.store.write().await;
        let documents = self.documents_mut(&mut store);

        match DocumentEvaluator::position(documents, &filter)? {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn close(self) -> Result<(), MemoryError> {
        debug!(database = %self.database, collection = %self.collection, "closed memory connection");
        Ok(())
    }
}
