//! Synchronized key-value store interface and backends.
//!
//! The store persists the full rule set under a single key, replicates it
//! across devices, and emits a change notification for every write, local or
//! remote. Backends are callback-terminated like the engine. The persisted
//! value shape is the canonical rule set as a JSON mapping from rule key to
//! rule.

pub mod memory;
pub mod sqlite;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::adapter::Completion;
use crate::core::RuleSet;
use crate::error::SyncError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// One change to a persisted entry, delivered to every subscriber. `None`
/// stands for an absent value (entry created or removed).
#[derive(Debug, Clone)]
pub struct StoreChange {
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// Persistent, replicated key-value store holding the authoritative rule set.
pub trait SyncedStore: Send + Sync {
    /// Fetch the value under `key`; `None` if absent.
    fn get(&self, key: &str, done: Completion<Option<Value>>);

    /// Write a full replacement of the value under `key`.
    fn set(&self, key: &str, value: Value, done: Completion<()>);

    /// Remove every persisted entry.
    fn clear(&self, done: Completion<()>);

    /// Change-notification feed: one event per changed key, from this or any
    /// other replica.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}

/// Serialize a rule set into the persisted value shape.
pub fn encode_rules(set: &RuleSet) -> Result<Value, SyncError> {
    Ok(serde_json::to_value(set)?)
}

/// Deserialize a persisted value back into a rule set.
pub fn decode_rules(value: Value) -> Result<RuleSet, SyncError> {
    Ok(serde_json::from_value(value)?)
}
