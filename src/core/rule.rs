//! Rule data model: patterns, settings, and the canonical rule set.
//!
//! A rule's identity is its key, derived deterministically from its patterns.
//! The canonical rule set maps keys to rules; `BTreeMap` keeps keys in
//! lexicographic order, which is also the display order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config;

/// What the engine does with requests matching a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSetting {
    Allow,
    Block,
    SessionOnly,
}

/// A pattern-keyed entry controlling behavior for matching requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Required match pattern, e.g. `a.com/*`.
    pub primary_pattern: String,
    /// Optional refinement; absent means "match anything".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_pattern: Option<String>,
    pub setting: RuleSetting,
}

impl Rule {
    pub fn new(primary_pattern: impl Into<String>, setting: RuleSetting) -> Self {
        Self {
            primary_pattern: primary_pattern.into(),
            secondary_pattern: None,
            setting,
        }
    }

    pub fn with_secondary(
        primary_pattern: impl Into<String>,
        secondary_pattern: impl Into<String>,
        setting: RuleSetting,
    ) -> Self {
        Self {
            primary_pattern: primary_pattern.into(),
            secondary_pattern: Some(secondary_pattern.into()),
            setting,
        }
    }

    /// Deterministic identity: `primary;secondary`, with an absent secondary
    /// contributing the match-all pattern. Two rules with equal patterns have
    /// equal keys.
    pub fn key(&self) -> String {
        format!(
            "{}{}{}",
            self.primary_pattern,
            config::RULE_KEY_SEPARATOR,
            self.secondary_pattern
                .as_deref()
                .unwrap_or(config::MATCH_ALL_PATTERN)
        )
    }
}

/// The canonical rule set: single source of truth, keyed by rule key.
/// The engine's live state is a derived, rebuildable projection of it.
pub type RuleSet = BTreeMap<String, Rule>;

/// Build a rule set from individual rules, later duplicates overwriting
/// earlier ones (last-write-wins).
pub fn rule_set_from(rules: impl IntoIterator<Item = Rule>) -> RuleSet {
    rules.into_iter().map(|r| (r.key(), r)).collect()
}
