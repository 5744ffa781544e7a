//! Core domain state: rules, keys, and the canonical store mirror.
//!
//! - [`Rule`] / [`RuleSetting`] — pattern-keyed entries and their settings
//! - [`RuleSet`] — the canonical mapping from rule key to rule
//! - [`StoreMirror`] — in-process mirror of the synchronized store

pub mod mirror;
pub mod rule;

pub use mirror::StoreMirror;
pub use rule::{rule_set_from, Rule, RuleSet, RuleSetting};
