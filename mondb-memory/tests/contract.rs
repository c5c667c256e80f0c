use std::{sync::Arc, time::Duration};

use mondb_core::{
    config::StoreConfig,
    document,
    document::Value,
    error::{AdapterError, DeadlineExceeded},
    id::DocumentId,
    store::{DocumentStore, StoreHandle},
};
use mondb_memory::{MemoryConnector, MemoryError, MemoryStore};

const URL: &str = "memory://contract";
const HEX: &str = "64b7f0c2a1d3e4f5a6b7c8d9";

async fn connected() -> (MemoryStore, MemoryConnector) {
    let connector = MemoryConnector::new();
    let mut store = StoreHandle::from_config(connector.clone(), StoreConfig::new("db", "coll"));
    store.connect(URL).await.unwrap();
    (store, connector)
}

#[tokio::test]
async fn unconnected_handles_touch_nothing() {
    let connector = MemoryConnector::new();
    let store = StoreHandle::from_config(connector.clone(), StoreConfig::new("db", "coll"));

    let err = store.insert_one(Some(document! { "name" => "pi" })).await.unwrap_err();
    assert_eq!(err.adapter(), Some(&AdapterError::NotConnected));
    assert!(store.find_one(document! { "_id" => "not-a-hex-id" }).await.unwrap_err().is_not_connected());
    assert!(store.find_many(document! {}).await.unwrap_err().is_not_connected());
    assert!(store.update_one(document! {}, None).await.unwrap_err().is_not_connected());
    assert!(store.delete_one(document! {}).await.unwrap_err().is_not_connected());

    assert!(connector.snapshot("db", "coll").await.is_empty());
}

#[tokio::test]
async fn pi_lifecycle() {
    let (mut store, _) = connected().await;

    store
        .insert_one(Some(document! { "name" => "pi", "value" => 3.14159 }))
        .await
        .unwrap();

    let pi = store.find_one(document! { "name" => "pi" }).await.unwrap();
    assert_eq!(pi["name"], Value::from("pi"));
    assert_eq!(pi["value"], Value::Float(3.14159));
    let id = pi["_id"].as_str().unwrap();
    assert!(DocumentId::parse_hex(id).is_ok());

    assert!(store.delete_one(document! { "value" => 3.14159 }).await.unwrap());
    assert!(store.find_one(document! { "name" => "pi" }).await.unwrap_err().is_not_found());

    store.disconnect().await;
}

#[tokio::test]
async fn caller_supplied_identifiers_round_trip() {
    let (store, connector) = connected().await;

    store
        .insert_one(Some(document! { "_id" => HEX, "name" => "e" }))
        .await
        .unwrap();

    let stored = connector.snapshot("db", "coll").await;
    assert_eq!(stored[0]["_id"], Value::ObjectId(HEX.parse().unwrap()));

    let found = store.find_one(document! { "_id" => HEX }).await.unwrap();
    assert_eq!(found["_id"], Value::from(HEX));
    assert_eq!(found["name"], Value::from("e"));
}

#[tokio::test]
async fn malformed_identifiers_are_rejected_everywhere() {
    let (store, connector) = connected().await;
    store.insert_one(Some(document! { "name" => "pi" })).await.unwrap();

    for bad in ["not-a-hex-id", "64B7F0C2A1D3E4F5A6B7C8D9", "64b7f0c2"] {
        let filter = || document! { "_id" => bad };

        assert!(store.find_one(filter()).await.unwrap_err().is_invalid_id());
        assert!(store.find_many(filter()).await.unwrap_err().is_invalid_id());
        assert!(store.insert_one(Some(filter())).await.unwrap_err().is_invalid_id());
        assert!(store.update_one(filter(), Some(document! { "x" => 1 })).await.unwrap_err().is_invalid_id());
        assert!(store.delete_one(filter()).await.unwrap_err().is_invalid_id());
    }

    assert_eq!(connector.snapshot("db", "coll").await.len(), 1);
}

#[tokio::test]
async fn find_many_treats_no_matches_as_not_found() {
    let (store, _) = connected().await;

    assert!(store.find_many(document! { "value" => 3.148 }).await.unwrap_err().is_not_found());

    store.insert_one(Some(document! { "name" => "pi", "value" => 3.14159 })).await.unwrap();
    store.insert_one(Some(document! { "name" => "pi", "value" => 3.14 })).await.unwrap();
    store.insert_one(Some(document! { "name" => "e", "value" => 2.71828 })).await.unwrap();

    let pis = store.find_many(document! { "name" => "pi" }).await.unwrap();
    assert_eq!(pis.len(), 2);
    assert!(pis.iter().all(|doc| doc["_id"].as_str().is_some()));
    assert_eq!(pis[0]["value"], Value::Float(3.14159));
    assert_eq!(pis[1]["value"], Value::Float(3.14));
}

#[tokio::test]
async fn update_reports_only_effective_changes() {
    let (store, _) = connected().await;
    store
        .insert_one(Some(document! { "_id" => HEX, "name" => "pi", "value" => 3.14159 }))
        .await
        .unwrap();

    assert!(store.update_one(document! { "value" => 3.14159 }, Some(document! { "value" => 500 })).await.unwrap());
    assert!(!store.update_one(document! { "_id" => HEX }, Some(document! { "value" => 500 })).await.unwrap());
    assert!(!store.update_one(document! { "name" => "tau" }, Some(document! { "value" => 1 })).await.unwrap());

    let doc = store.find_one(document! { "_id" => HEX }).await.unwrap();
    assert_eq!(doc["name"], Value::from("pi"));
    assert_eq!(doc["value"], Value::Int(500));
}

#[tokio::test]
async fn absent_bodies_are_empty_objects() {
    let (store, connector) = connected().await;

    assert_eq!(
        store.insert_one(None).await.unwrap_err().adapter(),
        Some(&AdapterError::EmptyObject),
    );
    assert!(store.update_one(document! { "name" => "pi" }, None).await.unwrap_err().is_empty_object());
    assert!(connector.snapshot("db", "coll").await.is_empty());
}

#[tokio::test]
async fn deleting_nothing_is_not_an_error() {
    let (store, _) = connected().await;

    assert!(!store.delete_one(document! { "name" => "ghost" }).await.unwrap());
}

#[tokio::test]
async fn backend_errors_keep_their_identity() {
    let (store, _) = connected().await;
    store.insert_one(Some(document! { "_id" => HEX })).await.unwrap();

    let duplicate = store.insert_one(Some(document! { "_id" => HEX })).await.unwrap_err();
    assert!(matches!(duplicate.backend(), Some(MemoryError::DuplicateKey(id, _)) if id == HEX));

    let operator = store
        .find_many(document! { "value" => document! { "$gt" => 3 } })
        .await
        .unwrap_err();
    assert_eq!(operator.into_backend(), Some(MemoryError::UnsupportedOperator("$gt".into())));
}

#[tokio::test]
async fn bad_urls_fail_to_connect() {
    let mut store = MemoryStore::new("db", "coll");

    let err = store.connect("mongodb://localhost:27017").await.unwrap_err();

    assert!(matches!(err.backend(), Some(MemoryError::InvalidUrl(_))));
    assert!(!store.is_connected());
}

#[tokio::test]
async fn disconnected_handles_refuse_work() {
    let (mut store, _) = connected().await;

    store.disconnect().await;
    store.disconnect().await;

    assert!(store.find_one(document! {}).await.unwrap_err().is_not_connected());
}

#[tokio::test]
async fn reconnecting_keeps_the_data() {
    let (mut store, _) = connected().await;
    store.insert_one(Some(document! { "name" => "pi" })).await.unwrap();

    store.connect(URL).await.unwrap();

    assert!(store.find_one(document! { "name" => "pi" }).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn slow_backends_hit_the_deadline() {
    let timeout = Duration::from_secs(1);
    let connector = MemoryConnector::new().with_latency(Duration::from_millis(1500));
    let config = StoreConfig::builder("db", "coll").timeout(timeout).build();
    let mut store = StoreHandle::from_config(connector, config);

    // 1.5s fits inside the doubled connect and ping deadlines.
    store.connect(URL).await.unwrap();

    let err = store.find_one(document! { "name" => "pi" }).await.unwrap_err();
    assert_eq!(err.into_backend(), Some(MemoryError::Deadline(DeadlineExceeded(timeout))));
}

#[tokio::test]
async fn handles_substitute_behind_the_contract() {
    let mut store: Box<dyn DocumentStore<Error = MemoryError>> =
        Box::new(MemoryStore::new("db", "coll"));

    store.connect(URL).await.unwrap();
    store.insert_one(Some(document! { "name" => "pi" })).await.unwrap();

    assert_eq!(store.find_many(document! {}).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_operations_share_one_handle() {
    let (store, connector) = connected().await;
    let store = Arc::new(store);

    let tasks = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store.insert_one(Some(document! { "n" => i, "kind" => "counter" })).await
            })
        })
        .collect::<Vec<_>>();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(store.find_many(document! { "kind" => "counter" }).await.unwrap().len(), 16);
    assert_eq!(connector.snapshot("db", "coll").await.len(), 16);
}
