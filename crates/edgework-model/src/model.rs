//! Model trait and its storage manager.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::store::{KvStore, PutOptions};

/// A JSON document stored under a prefixed key.
///
/// # Example
///
/// ```
/// use edgework_model::Model;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     username: String,
/// }
///
/// impl Model for User {
///     const PREFIX: &'static str = "user";
///
///     fn id(&self) -> Option<String> {
///         Some(self.username.clone())
///     }
/// }
///
/// assert_eq!(User::storage_key("alice"), "user-alice");
/// ```
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Key prefix, joined to the id with `-`. Empty means no prefix.
    const PREFIX: &'static str = "";

    /// Returns the id this instance is stored under.
    fn id(&self) -> Option<String>;

    /// Returns the storage key for an id.
    fn storage_key(id: &str) -> String {
        if Self::PREFIX.is_empty() {
            id.to_string()
        } else {
            format!("{}-{id}", Self::PREFIX)
        }
    }

    /// Builds an instance from its stored JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Serialization`] if the document does not fit.
    fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns the JSON document to store.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Serialization`] if the instance cannot be
    /// represented as JSON.
    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Returns a manager for this model backed by `store`.
    fn objects(store: Arc<dyn KvStore>) -> Manager<Self> {
        Manager::new(store)
    }
}

/// Reads and writes one model type through a [`KvStore`].
///
/// Managers are cheap to clone; clones share the store.
pub struct Manager<M: Model> {
    store: Arc<dyn KvStore>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Model> Clone for Manager<M> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<M: Model> std::fmt::Debug for Manager<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("model", &std::any::type_name::<M>())
            .field("prefix", &M::PREFIX)
            .finish_non_exhaustive()
    }
}

impl<M: Model> Manager<M> {
    /// Creates a manager backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// Loads the instance stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Serialization`] for a stored value that is not
    /// valid JSON for `M`, or the store's own error.
    pub async fn get(&self, id: &str) -> Result<Option<M>> {
        let key = M::storage_key(id);
        debug!(key = %key, "loading model");
        match self.store.get(&key).await? {
            Some(data) => {
                let value: Value = serde_json::from_str(&data)?;
                M::from_json(value).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Stores `model` under its id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingId`] if the model has no id.
    pub async fn save(&self, model: &M) -> Result<()> {
        self.save_with(model, PutOptions::default()).await
    }

    /// Stores `model` under its id with expiry or metadata.
    ///
    /// # Errors
    ///
    /// See [`Manager::save`].
    pub async fn save_with(&self, model: &M, options: PutOptions) -> Result<()> {
        let id = model
            .id()
            .filter(|id| !id.is_empty())
            .ok_or(ModelError::MissingId)?;
        let key = M::storage_key(&id);
        let data = serde_json::to_string(&model.to_json()?)?;
        debug!(key = %key, bytes = data.len(), "saving model");
        self.store.put(&key, data, options).await
    }

    /// Removes the instance stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let key = M::storage_key(id);
        debug!(key = %key, "deleting model");
        self.store.delete(&key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Bare {
        id: String,
    }

    impl Model for Bare {
        fn id(&self) -> Option<String> {
            Some(self.id.clone())
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Prefixed;

    impl Model for Prefixed {
        const PREFIX: &'static str = "pref";

        fn id(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_storage_key_prefix() {
        assert_eq!(Bare::storage_key("plep"), "plep");
        assert_eq!(Prefixed::storage_key("plep"), "pref-plep");
    }

    #[test]
    fn test_default_json_hooks() {
        let bare = Bare { id: "a".to_string() };
        let value = bare.to_json().unwrap();
        assert_eq!(value, serde_json::json!({"id": "a"}));
        assert_eq!(Bare::from_json(value).unwrap().id, "a");
        assert!(Bare::from_json(serde_json::json!({"nope": 1})).is_err());
    }
}
