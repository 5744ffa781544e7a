//! In-process mirror of the canonical rule set held by the synchronized store.
//!
//! The mirror is the only shared mutable resource in the crate. It is
//! refreshed on initial load and replaced wholesale on every external change
//! notification (last writer wins, no merge). Display observers follow it
//! through a watch channel.

use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::watch;

use crate::adapter;
use crate::config;
use crate::core::rule::RuleSet;
use crate::error::SyncError;
use crate::status::StatusReporter;
use crate::store::{decode_rules, encode_rules, SyncedStore};

/// Latest known canonical rule set, kept fresh from the synchronized store.
pub struct StoreMirror {
    rules: Mutex<RuleSet>,
    refresh: watch::Sender<RuleSet>,
}

impl StoreMirror {
    pub fn new() -> Self {
        let (refresh, _) = watch::channel(RuleSet::new());
        Self {
            rules: Mutex::new(RuleSet::new()),
            refresh,
        }
    }

    /// Cloned view of the current rule set.
    pub fn snapshot(&self) -> RuleSet {
        self.rules.lock().unwrap().clone()
    }

    /// Replace the rule set wholesale and notify display observers.
    pub fn replace(&self, set: RuleSet) {
        *self.rules.lock().unwrap() = set.clone();
        self.refresh.send_replace(set);
    }

    /// Insert a rule under its key (overwriting any previous entry) and
    /// return the updated set.
    pub fn insert(&self, rule: crate::core::Rule) -> RuleSet {
        let updated = {
            let mut rules = self.rules.lock().unwrap();
            rules.insert(rule.key(), rule);
            rules.clone()
        };
        self.refresh.send_replace(updated.clone());
        updated
    }

    /// Subscribe to refresh notifications (full set on every change).
    pub fn subscribe(&self) -> watch::Receiver<RuleSet> {
        self.refresh.subscribe()
    }

    /// Fetch the persisted rule set and replace the mirror with it.
    /// An absent persisted value means an empty set, not an error.
    pub async fn load(
        &self,
        store: &dyn SyncedStore,
        status: &StatusReporter,
    ) -> Result<(), SyncError> {
        let value =
            adapter::tracked(status, move |done| store.get(config::RULES_STORE_KEY, done)).await?;
        let set = match value {
            Some(value) => decode_rules(value)?,
            None => RuleSet::new(),
        };
        tracing::info!("Loaded {} rules from the synchronized store", set.len());
        self.replace(set);
        Ok(())
    }

    /// React to a change notification from this or another replica: replace
    /// the mirror with the reported value (`None` means the set was cleared).
    /// Undecodable payloads are logged and ignored, keeping the current set.
    pub fn apply_external_change(&self, new_value: Option<Value>) {
        let set = match new_value {
            None => RuleSet::new(),
            Some(value) => match decode_rules(value) {
                Ok(set) => set,
                Err(err) => {
                    tracing::warn!("Ignoring undecodable rule set from change notification: {err}");
                    return;
                }
            },
        };
        tracing::debug!("Mirror replaced from change notification ({} rules)", set.len());
        self.replace(set);
    }

    /// Write `set` as the full persisted replacement. Does not touch the
    /// in-memory set; callers update it optimistically before persisting.
    pub async fn persist(
        &self,
        set: &RuleSet,
        store: &dyn SyncedStore,
        status: &StatusReporter,
    ) -> Result<(), SyncError> {
        let value = encode_rules(set)?;
        adapter::tracked(status, move |done| {
            store.set(config::RULES_STORE_KEY, value, done)
        })
        .await
    }
}

impl Default for StoreMirror {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rule::{rule_set_from, Rule, RuleSetting};
    use crate::store::MemoryStore;

    fn sample_set() -> RuleSet {
        rule_set_from([
            Rule::new("a.com/*", RuleSetting::Allow),
            Rule::with_secondary("b.com/*", "cdn.b.com/*", RuleSetting::Block),
        ])
    }

    #[test]
    fn test_replace_updates_snapshot() {
        let mirror = StoreMirror::new();
        mirror.replace(sample_set());
        assert_eq!(mirror.snapshot(), sample_set());
    }

    #[test]
    fn test_insert_overwrites_equal_key() {
        let mirror = StoreMirror::new();
        mirror.insert(Rule::new("a.com/*", RuleSetting::Allow));
        let updated = mirror.insert(Rule::new("a.com/*", RuleSetting::Block));
        assert_eq!(updated.len(), 1);
        assert_eq!(updated["a.com/*;*"].setting, RuleSetting::Block);
    }

    #[tokio::test]
    async fn test_replace_notifies_subscribers() {
        let mirror = StoreMirror::new();
        let mut rx = mirror.subscribe();
        mirror.replace(sample_set());
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), sample_set());
    }

    #[test]
    fn test_external_change_none_empties_mirror() {
        let mirror = StoreMirror::new();
        mirror.replace(sample_set());
        mirror.apply_external_change(None);
        assert!(mirror.snapshot().is_empty());
    }

    #[test]
    fn test_external_change_replaces_wholesale() {
        let mirror = StoreMirror::new();
        mirror.replace(sample_set());

        let remote = rule_set_from([Rule::new("c.org/*", RuleSetting::SessionOnly)]);
        mirror.apply_external_change(Some(serde_json::to_value(&remote).unwrap()));
        assert_eq!(mirror.snapshot(), remote);
    }

    #[test]
    fn test_external_change_ignores_undecodable_payload() {
        let mirror = StoreMirror::new();
        mirror.replace(sample_set());
        mirror.apply_external_change(Some(serde_json::json!("not a rule map")));
        assert_eq!(mirror.snapshot(), sample_set());
    }

    #[tokio::test]
    async fn test_load_absent_value_means_empty_set() {
        let mirror = StoreMirror::new();
        mirror.replace(sample_set());

        let store = MemoryStore::new();
        let status = StatusReporter::new();
        mirror.load(&store, &status).await.unwrap();
        assert!(mirror.snapshot().is_empty());
        assert_eq!(status.message(), "");
    }

    #[tokio::test]
    async fn test_persist_then_load_round_trips() {
        let store = MemoryStore::new();
        let status = StatusReporter::new();

        let writer = StoreMirror::new();
        writer
            .persist(&sample_set(), &store, &status)
            .await
            .unwrap();

        let reader = StoreMirror::new();
        reader.load(&store, &status).await.unwrap();
        assert_eq!(reader.snapshot(), sample_set());
    }
}
