//! Model persistence through a key-value store.

mod common;
use common::*;

use std::sync::Arc;

use chrono::Duration;
use edgework_model::{KvStore, Manager, MemoryStore, Model, ModelError, PutOptions, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Abc {
    a: i64,
    b: i64,
    c: i64,
}

impl Model for Abc {
    const PREFIX: &'static str = "get";

    fn id(&self) -> Option<String> {
        Some(self.a.to_string())
    }
}

/// Keeps `c` apart from the other fields, rebuilt by a custom hook.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Split {
    #[serde(flatten)]
    ab: Ab,
    #[serde(skip)]
    c: i64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Ab {
    a: i64,
    b: i64,
}

impl Model for Split {
    const PREFIX: &'static str = "get";

    fn id(&self) -> Option<String> {
        Some(self.ab.a.to_string())
    }

    fn from_json(value: Value) -> Result<Self> {
        let c = value["c"].as_i64().unwrap_or_default();
        Ok(Self {
            ab: serde_json::from_value(value)?,
            c,
        })
    }

    fn to_json(&self) -> Result<Value> {
        Ok(json!({ "a": self.ab.a, "b": self.ab.b, "c": self.c }))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Anonymous {
    id: Option<String>,
}

impl Model for Anonymous {
    fn id(&self) -> Option<String> {
        self.id.clone()
    }
}

#[tokio::test]
async fn finds_and_builds_a_model() {
    let store = Arc::new(RecordingStore::new());
    store
        .inner
        .put("get-test_id", json!({"a": 1, "b": 2, "c": 3}).to_string(), PutOptions::new())
        .await
        .unwrap();

    let model = Abc::objects(store.clone()).get("test_id").await.unwrap();
    assert_eq!(model, Some(Abc { a: 1, b: 2, c: 3 }));
    assert_eq!(store.calls(), vec![Call::Get("get-test_id".to_string())]);
}

#[tokio::test]
async fn finds_a_model_through_a_custom_hook() {
    let store = Arc::new(RecordingStore::new());
    store
        .inner
        .put("get-test_id", json!({"a": 1, "b": 2, "c": 3}).to_string(), PutOptions::new())
        .await
        .unwrap();

    let model = Split::objects(store.clone())
        .get("test_id")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(model.ab, Ab { a: 1, b: 2 });
    assert_eq!(model.c, 3);
    assert_eq!(store.calls().len(), 1);
}

#[tokio::test]
async fn missing_model_is_none() {
    let manager: Manager<Abc> = Manager::new(Arc::new(MemoryStore::new()));
    assert_eq!(manager.get("nope").await.unwrap(), None);
}

#[tokio::test]
async fn corrupt_value_is_an_error() {
    let store = Arc::new(MemoryStore::new());
    store
        .put("get-1", "not json".to_string(), PutOptions::new())
        .await
        .unwrap();

    let err = Abc::objects(store).get("1").await.unwrap_err();
    assert!(matches!(err, ModelError::Serialization(_)));
}

#[tokio::test]
async fn saves_a_model_under_its_key() {
    let store = Arc::new(RecordingStore::new());
    let manager = Abc::objects(store.clone());

    let model = Abc { a: 5, b: 7, c: 9 };
    manager.save(&model).await.unwrap();

    assert_eq!(
        store.calls(),
        vec![Call::Put(
            "get-5".to_string(),
            json!({"a": 5, "b": 7, "c": 9}).to_string()
        )]
    );
    assert_eq!(manager.get("5").await.unwrap(), Some(model));
}

#[tokio::test]
async fn saves_through_a_custom_hook() {
    let store = Arc::new(MemoryStore::new());
    let manager = Split::objects(store.clone());

    let model = Split {
        ab: Ab { a: 1, b: 2 },
        c: 3,
    };
    manager.save(&model).await.unwrap();

    let raw: Value = serde_json::from_str(&store.get("get-1").await.unwrap().unwrap()).unwrap();
    assert_eq!(raw, json!({"a": 1, "b": 2, "c": 3}));
    assert_eq!(manager.get("1").await.unwrap(), Some(model));
}

#[tokio::test]
async fn saving_without_id_fails() {
    let store = Arc::new(RecordingStore::new());
    let manager = Anonymous::objects(store.clone());

    for model in [Anonymous { id: None }, Anonymous { id: Some(String::new()) }] {
        let err = manager.save(&model).await.unwrap_err();
        assert!(matches!(err, ModelError::MissingId));
    }
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn unprefixed_models_use_the_bare_id() {
    let store = Arc::new(MemoryStore::new());
    Anonymous::objects(store.clone())
        .save(&Anonymous {
            id: Some("plep".to_string()),
        })
        .await
        .unwrap();

    assert!(store.get("plep").await.unwrap().is_some());
}

#[tokio::test]
async fn save_with_options_sets_expiry_and_metadata() {
    let store = Arc::new(MemoryStore::new());
    let manager = Abc::objects(store.clone());

    let options = PutOptions::new()
        .expiration_ttl(Duration::minutes(10))
        .metadata(json!({"source": "test"}));
    manager
        .save_with(&Abc { a: 1, b: 0, c: 0 }, options)
        .await
        .unwrap();

    let entry = store.get_with_metadata("get-1").await.unwrap().unwrap();
    assert!(entry.expires_at.is_some());
    assert_eq!(entry.metadata, Some(json!({"source": "test"})));
}

#[tokio::test]
async fn expired_models_are_gone() {
    let store = Arc::new(MemoryStore::new());
    let manager = Abc::objects(store);

    let options = PutOptions::new().expiration_ttl(Duration::seconds(-1));
    manager
        .save_with(&Abc { a: 2, b: 0, c: 0 }, options)
        .await
        .unwrap();

    assert_eq!(manager.get("2").await.unwrap(), None);
}

#[tokio::test]
async fn deletes_a_model() {
    let store = Arc::new(RecordingStore::new());
    let manager = Abc::objects(store.clone());

    manager.save(&Abc { a: 3, b: 0, c: 0 }).await.unwrap();
    manager.delete("3").await.unwrap();

    assert_eq!(manager.get("3").await.unwrap(), None);
    assert_eq!(store.calls()[1], Call::Delete("get-3".to_string()));
}

#[tokio::test]
async fn managers_share_their_store() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let writer = Abc::objects(Arc::clone(&store));
    let reader = writer.clone();

    writer.save(&Abc { a: 4, b: 4, c: 4 }).await.unwrap();
    assert!(reader.get("4").await.unwrap().is_some());
    assert!(Arc::ptr_eq(writer.store(), reader.store()));
}

#[tokio::test]
async fn store_failures_propagate() {
    let store = Arc::new(RecordingStore::new());
    let manager = Abc::objects(store.clone());
    manager.save(&Abc { a: 5, b: 0, c: 0 }).await.unwrap();

    store.fail();
    assert!(matches!(manager.get("5").await, Err(ModelError::Store(_))));
    assert!(matches!(
        manager.save(&Abc { a: 5, b: 1, c: 1 }).await,
        Err(ModelError::Store(_))
    ));
    assert!(matches!(manager.delete("5").await, Err(ModelError::Store(_))));

    // Calls still reached the store, the stored value is untouched.
    assert_eq!(store.calls().len(), 4);
    assert!(store.inner.get("get-5").await.unwrap().is_some());
}
