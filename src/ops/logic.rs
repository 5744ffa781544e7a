//! Pure reconciliation helpers extracted from the operation handlers.
//!
//! These functions take plain parameters and can be unit-tested without a
//! runtime or external collaborators.

use crate::core::RuleSet;
use crate::error::SyncError;

/// Outcome of a replay pass: how many engine set-calls were issued and which
/// entries' calls failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub attempted: usize,
    pub failed: Vec<String>,
}

impl ReplayOutcome {
    pub fn fully_applied(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The rule set with one entry removed; the input set is left untouched.
pub fn without_key(set: &RuleSet, rule_key: &str) -> RuleSet {
    let mut remaining = set.clone();
    remaining.remove(rule_key);
    remaining
}

/// Pair replayed keys with their settled outcomes.
pub fn replay_outcome(keys: Vec<String>, settled: &[Result<(), SyncError>]) -> ReplayOutcome {
    let failed = keys
        .iter()
        .zip(settled)
        .filter(|(_, outcome)| outcome.is_err())
        .map(|(key, _)| key.clone())
        .collect();
    ReplayOutcome {
        attempted: keys.len(),
        failed,
    }
}
