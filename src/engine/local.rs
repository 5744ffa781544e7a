//! In-process rule engine backend over a concurrent rule table.

use dashmap::DashMap;

use crate::adapter::Completion;
use crate::core::Rule;
use crate::engine::RuleEngine;

/// Rule engine holding its live state in process memory. Keyed by rule key,
/// so setting a rule with an existing key overwrites the previous entry.
pub struct LocalRuleEngine {
    rules: DashMap<String, Rule>,
}

impl LocalRuleEngine {
    pub fn new() -> Self {
        Self {
            rules: DashMap::new(),
        }
    }

    /// Number of currently installed rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Keys of currently installed rules, sorted.
    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.rules.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl Default for LocalRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine for LocalRuleEngine {
    fn set(&self, rule: Rule, done: Completion<()>) {
        let key = rule.key();
        tracing::debug!("Engine installing rule {key}");
        self.rules.insert(key, rule);
        done(Ok(()));
    }

    fn clear_all(&self, done: Completion<()>) {
        tracing::debug!("Engine clearing {} rules", self.rules.len());
        self.rules.clear();
        done(Ok(()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::adapted;
    use crate::core::RuleSetting;

    #[tokio::test]
    async fn test_set_installs_rule_under_its_key() {
        let engine = LocalRuleEngine::new();
        adapted(|done| engine.set(Rule::new("a.com/*", RuleSetting::Allow), done))
            .await
            .unwrap();
        assert_eq!(engine.active_keys(), ["a.com/*;*"]);
    }

    #[tokio::test]
    async fn test_set_overwrites_equal_key() {
        let engine = LocalRuleEngine::new();
        adapted(|done| engine.set(Rule::new("a.com/*", RuleSetting::Allow), done))
            .await
            .unwrap();
        adapted(|done| engine.set(Rule::new("a.com/*", RuleSetting::Block), done))
            .await
            .unwrap();
        assert_eq!(engine.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_all_empties_engine() {
        let engine = LocalRuleEngine::new();
        adapted(|done| engine.set(Rule::new("a.com/*", RuleSetting::Allow), done))
            .await
            .unwrap();
        adapted(|done| engine.set(Rule::new("b.com/*", RuleSetting::Block), done))
            .await
            .unwrap();

        adapted(|done| engine.clear_all(done)).await.unwrap();
        assert!(engine.is_empty());
    }
}
