//! In-process store backend, the local replica used in tests and demos.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::adapter::Completion;
use crate::config;
use crate::store::{StoreChange, SyncedStore};

/// Store backend keeping entries in a mutexed map and echoing every write to
/// the change feed, as a replicated store does for its local replica.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
    feed: broadcast::Sender<StoreChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(config::CHANGE_FEED_CAPACITY);
        Self {
            entries: Mutex::new(HashMap::new()),
            feed,
        }
    }

    fn publish(&self, key: String, old_value: Option<Value>, new_value: Option<Value>) {
        // Nobody listening is fine; the feed is fire-and-forget.
        let _ = self.feed.send(StoreChange {
            key,
            old_value,
            new_value,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncedStore for MemoryStore {
    fn get(&self, key: &str, done: Completion<Option<Value>>) {
        let value = self.entries.lock().unwrap().get(key).cloned();
        done(Ok(value));
    }

    fn set(&self, key: &str, value: Value, done: Completion<()>) {
        let old = self
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        self.publish(key.to_string(), old, Some(value));
        done(Ok(()));
    }

    fn clear(&self, done: Completion<()>) {
        let drained: Vec<(String, Value)> =
            self.entries.lock().unwrap().drain().collect();
        for (key, old) in drained {
            self.publish(key, Some(old), None);
        }
        done(Ok(()));
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::adapted;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_absent_key_returns_none() {
        let store = MemoryStore::new();
        let value = adapted(|done| store.get("rules", done)).await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_then_get_returns_value() {
        let store = MemoryStore::new();
        adapted(|done| store.set("rules", json!({"a": 1}), done))
            .await
            .unwrap();
        let value = adapted(|done| store.get("rules", done)).await.unwrap();
        assert_eq!(value, Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_set_emits_change_with_old_and_new() {
        let store = MemoryStore::new();
        adapted(|done| store.set("rules", json!(1), done))
            .await
            .unwrap();

        let mut feed = store.subscribe();
        adapted(|done| store.set("rules", json!(2), done))
            .await
            .unwrap();

        let change = feed.recv().await.unwrap();
        assert_eq!(change.key, "rules");
        assert_eq!(change.old_value, Some(json!(1)));
        assert_eq!(change.new_value, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_clear_emits_removal_per_key() {
        let store = MemoryStore::new();
        adapted(|done| store.set("rules", json!(1), done))
            .await
            .unwrap();

        let mut feed = store.subscribe();
        adapted(|done| store.clear(done)).await.unwrap();

        let change = feed.recv().await.unwrap();
        assert_eq!(change.key, "rules");
        assert_eq!(change.old_value, Some(json!(1)));
        assert_eq!(change.new_value, None);

        let value = adapted(|done| store.get("rules", done)).await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_clear_on_empty_store_is_quiet() {
        let store = MemoryStore::new();
        let mut feed = store.subscribe();
        adapted(|done| store.clear(done)).await.unwrap();
        assert!(feed.try_recv().is_err());
    }
}
