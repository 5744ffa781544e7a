//! Live rule engine interface and backends.
//!
//! The engine enforces rules live but exposes only two operations: set one
//! rule and clear all rules. There is no selective delete; logical removal is
//! the reconciliation layer's job. Backends are callback-terminated, matching
//! the external systems this crate fronts.

pub mod local;

use crate::adapter::Completion;
use crate::core::Rule;

pub use local::LocalRuleEngine;

/// The live enforcement engine. Its state is a derived projection of the
/// canonical rule set, never itself authoritative.
pub trait RuleEngine: Send + Sync {
    /// Install or overwrite one rule.
    fn set(&self, rule: Rule, done: Completion<()>);

    /// Drop every installed rule. The only removal primitive the engine has.
    fn clear_all(&self, done: Completion<()>);
}
