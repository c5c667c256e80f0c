use std::fmt;

use async_trait::async_trait;
use bson::doc;
use futures::{StreamExt, TryStreamExt};
use mongodb::{
    Client, Collection,
    options::{ClientOptions, ReadPreference, SelectionCriteria},
};
use thiserror::Error;
use tracing::debug;

use mondb_core::{
    backend::{Connector, DocumentStream, StoreBackend, UpdateOutcome},
    config::StoreConfig,
    document::Document,
    error::DeadlineExceeded,
    store::StoreHandle,
};

use crate::convert::BsonConverter;


/// Connection string used when an application has no url of its own.
pub const DEFAULT_MONGO_URL: &str = "mongodb://localhost:27017";

/// A store handle backed by a MongoDB collection.
///
/// # Example
///
/// ```ignore
/// use mondb::mongodb::{DEFAULT_MONGO_URL, MongoStore};
///
/// let mut store = MongoStore::new("numbers", "testing");
/// store.connect(DEFAULT_MONGO_URL).await?;
/// ```
pub type MongoStore = StoreHandle<MongoConnector>;

/// Errors reported by the MongoDB backend.
#[derive(Error, Debug)]
pub enum MongoError {
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),
    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}

/// Opens MongoDB clients for store handles.
#[derive(Default, Clone, Debug)]
pub struct MongoConnector {
    app_name: Option<String>,
}

impl MongoConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `app_name` to the server unless the url already names one.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Backend = MongoBackend;

    async fn connect(&self, url: &str, config: &StoreConfig) -> Result<MongoBackend, MongoError> {
        let mut options = ClientOptions::parse(url).await?;

        // Without a bound the driver keeps retrying server selection for 30s.
        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(config.connect_timeout());
        }
        if options.app_name.is_none() {
            options.app_name = self.app_name.clone();
        }

        let client = Client::with_options(options)?;
        let collection = client
            .database(&config.database)
            .collection::<bson::Document>(&config.collection);

        Ok(MongoBackend { client, collection })
    }
}

/// A connected client bound to one collection.
pub struct MongoBackend {
    client: Client,
    collection: Collection<bson::Document>,
}

impl fmt::Debug for MongoBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoBackend")
            .field("namespace", &self.collection.namespace().to_string())
            .finish()
    }
}

#[async_trait]
impl StoreBackend for MongoBackend {
    type Error = MongoError;

    async fn ping(&self) -> Result<(), MongoError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
            .await?;

        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, MongoError> {
        Ok(
            self.collection
                .find_one(BsonConverter::to_document(filter))
                .await?
                .map(BsonConverter::from_document)
        )
    }

    async fn find(&self, filter: Document) -> Result<DocumentStream<MongoError>, MongoError> {
        let cursor = self.collection
            .find(BsonConverter::to_document(filter))
            .await?;

        Ok(
            cursor
                .map_ok(BsonConverter::from_document)
                .map_err(MongoError::from)
                .boxed()
        )
    }

    async fn insert_one(&self, document: Document) -> Result<(), MongoError> {
        let result = self.collection
            .insert_one(BsonConverter::to_document(document))
            .await?;

        debug!(namespace = %self.collection.namespace(), id = %result.inserted_id, "inserted document");
        Ok(())
    }

    async fn update_one(&self, filter: Document, set: Document) -> Result<UpdateOutcome, MongoError> {
        let result = self.collection
            .update_one(
                BsonConverter::to_document(filter),
                doc! { "$set": BsonConverter::to_document(set) },
            )
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, MongoError> {
        Ok(
            self.collection
                .delete_one(BsonConverter::to_document(filter))
                .await?
                .deleted_count
        )
    }

    async fn close(self) -> Result<(), MongoError> {
        self.client.shutdown().await;

        Ok(())
    }
}
