//! Runs the store contract against a live MongoDB server.
//!
//! These tests are ignored by default. Start a server and run them with
//! `MONDB_TEST_URL=mongodb://... cargo test -p mondb-mongodb -- --ignored`;
//! without the variable they target `mongodb://localhost:27017`.

use std::time::Duration;

use mondb_core::{
    document,
    document::Value,
    error::AdapterError,
    id::DocumentId,
    store::DocumentStore,
};
use mondb_mongodb::{DEFAULT_MONGO_URL, MongoError, MongoStore};

fn url() -> String {
    std::env::var("MONDB_TEST_URL").unwrap_or_else(|_| DEFAULT_MONGO_URL.to_string())
}

/// Connects to a collection unique to the calling test, emptied before use.
async fn connected(collection: &str) -> MongoStore {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("mondb_core=debug,mondb_mongodb=debug")
        .try_init();

    let mut store = MongoStore::new("mondb_test", collection);
    store.connect(&url()).await.unwrap();

    while store.delete_one(document! {}).await.unwrap() {}
    store
}

#[tokio::test]
#[ignore = "requires a MongoDB server"]
async fn pi_lifecycle() {
    let mut store = connected("pi_lifecycle").await;

    store
        .insert_one(Some(document! { "name" => "pi", "value" => 3.14159 }))
        .await
        .unwrap();

    let pi = store.find_one(document! { "name" => "pi" }).await.unwrap();
    assert_eq!(pi["value"], Value::Float(3.14159));
    let id = pi["_id"].as_str().unwrap().to_string();
    assert!(DocumentId::parse_hex(&id).is_ok());

    assert!(store.update_one(document! { "_id" => id.as_str() }, Some(document! { "value" => 500 })).await.unwrap());
    assert!(!store.update_one(document! { "_id" => id.as_str() }, Some(document! { "value" => 500 })).await.unwrap());

    let updated = store.find_one(document! { "_id" => id.as_str() }).await.unwrap();
    assert_eq!(updated["value"], Value::Int(500));
    assert_eq!(updated["name"], Value::from("pi"));

    assert!(store.delete_one(document! { "_id" => id.as_str() }).await.unwrap());
    assert!(!store.delete_one(document! { "_id" => id.as_str() }).await.unwrap());
    assert!(store.find_one(document! { "name" => "pi" }).await.unwrap_err().is_not_found());

    store.disconnect().await;
    assert!(store.find_one(document! {}).await.unwrap_err().is_not_connected());
}

#[tokio::test]
#[ignore = "requires a MongoDB server"]
async fn find_many_returns_every_match() {
    let store = connected("find_many").await;

    assert!(store.find_many(document! { "value" => 3.148 }).await.unwrap_err().is_not_found());

    for (name, value) in [("pi", 3.14159), ("pi", 3.14), ("e", 2.71828)] {
        store.insert_one(Some(document! { "name" => name, "value" => value })).await.unwrap();
    }

    let pis = store.find_many(document! { "name" => "pi" }).await.unwrap();
    assert_eq!(pis.len(), 2);
    assert!(pis.iter().all(|doc| doc["_id"].as_str().map(str::len) == Some(24)));

    let small = store
        .find_many(document! { "value" => document! { "$lt" => 3 } })
        .await
        .unwrap();
    assert_eq!(small.len(), 1);
    assert_eq!(small[0]["name"], Value::from("e"));
}

#[tokio::test]
#[ignore = "requires a MongoDB server"]
async fn identifiers_are_validated_before_the_server() {
    let store = connected("identifiers").await;

    let err = store.find_one(document! { "_id" => "not-a-hex-id" }).await.unwrap_err();
    assert_eq!(err.adapter(), Some(&AdapterError::InvalidId("not-a-hex-id".into())));

    let id = DocumentId::generate().to_hex();
    store.insert_one(Some(document! { "_id" => id.as_str(), "name" => "tau" })).await.unwrap();

    let duplicate = store.insert_one(Some(document! { "_id" => id.as_str() })).await.unwrap_err();
    assert!(matches!(duplicate.backend(), Some(MongoError::Driver(_))));
}

#[tokio::test]
#[ignore = "requires a MongoDB server"]
async fn unreachable_servers_fail_within_the_connect_deadline() {
    let mut store = MongoStore::with_timeout("mondb_test", "unreachable", Duration::from_secs(1));

    let err = store.connect("mongodb://127.0.0.1:1").await.unwrap_err();

    assert!(err.backend().is_some());
    assert!(!store.is_connected());
}
