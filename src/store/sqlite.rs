//! SQLite-backed store backend.
//!
//! Uses `rusqlite` with bundled SQLite. Entries live in a single key/value
//! table with JSON-encoded values; every write is echoed to the change feed,
//! so the listener sees local writes the same way it would see replicated
//! ones.

use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::adapter::Completion;
use crate::config;
use crate::error::SyncError;
use crate::store::{StoreChange, SyncedStore};

/// Store backend persisting entries to a SQLite key/value table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    feed: broadcast::Sender<StoreChange>,
}

impl SqliteStore {
    /// Open or create the store database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS synced_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        // Enable WAL mode for better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let (feed, _) = broadcast::channel(config::CHANGE_FEED_CAPACITY);
        Ok(Self {
            conn: Mutex::new(conn),
            feed,
        })
    }

    fn publish(&self, key: String, old_value: Option<Value>, new_value: Option<Value>) {
        let _ = self.feed.send(StoreChange {
            key,
            old_value,
            new_value,
        });
    }

    fn read_value(&self, key: &str) -> Result<Option<Value>, SyncError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached("SELECT value FROM synced_entries WHERE key = ?1")?;
        let text: Option<String> = stmt.query_row(params![key], |row| row.get(0)).optional()?;
        match text {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write_value(&self, key: &str, value: &Value) -> Result<Option<Value>, SyncError> {
        let old = self.read_value(key)?;
        let text = serde_json::to_string(value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO synced_entries (key, value) VALUES (?1, ?2)",
            params![key, text],
        )?;
        Ok(old)
    }

    fn drain_entries(&self) -> Result<Vec<(String, Value)>, SyncError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached("SELECT key, value FROM synced_entries")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut drained = Vec::new();
        for row in rows {
            let (key, text) = row?;
            drained.push((key, serde_json::from_str(&text)?));
        }
        drop(stmt);

        conn.execute("DELETE FROM synced_entries", [])?;
        Ok(drained)
    }
}

impl SyncedStore for SqliteStore {
    fn get(&self, key: &str, done: Completion<Option<Value>>) {
        done(self.read_value(key));
    }

    fn set(&self, key: &str, value: Value, done: Completion<()>) {
        match self.write_value(key, &value) {
            Ok(old) => {
                self.publish(key.to_string(), old, Some(value));
                done(Ok(()));
            }
            Err(err) => done(Err(err)),
        }
    }

    fn clear(&self, done: Completion<()>) {
        match self.drain_entries() {
            Ok(drained) => {
                for (key, old) in drained {
                    self.publish(key, Some(old), None);
                }
                done(Ok(()));
            }
            Err(err) => done(Err(err)),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.feed.subscribe()
    }
}
