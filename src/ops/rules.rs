//! The four reconciliation operations.
//!
//! The engine cannot delete a single rule, so removal is clear-then-replay:
//! clear everything, replay what should remain, then persist the reduced set
//! even when individual replay calls fail. An entry whose replay failed stays
//! in canonical state as a pending correction, so a later `set_all` or
//! `add_or_replace` can re-establish it in the engine. The invariant
//! protected: no rule the user added is ever permanently lost from canonical
//! state because of a transient engine failure during removal.

use std::sync::Arc;

use crate::adapter;
use crate::core::{Rule, RuleSet};
use crate::error::SyncError;

use super::logic::{replay_outcome, without_key, ReplayOutcome};
use super::state::SyncState;

/// Push one rule into the engine, then persist the canonical set with the
/// rule inserted under its key (overwriting any previous entry).
///
/// An engine failure stops the operation before canonical state is touched.
/// If the engine call succeeds but the persist fails, engine and store stay
/// divergent until the next `set_all` reconciles them.
pub async fn add_or_replace(state: &SyncState, rule: Rule) -> Result<(), SyncError> {
    let key = rule.key();
    let engine = Arc::clone(&state.engine);
    let pushed = rule.clone();
    adapter::tracked(&state.status, move |done| engine.set(pushed, done)).await?;

    let updated = state.mirror.insert(rule);
    state
        .mirror
        .persist(&updated, state.store.as_ref(), &state.status)
        .await?;
    tracing::info!("Stored rule {key} ({} total)", updated.len());
    Ok(())
}

/// Logical deletion of one rule against an engine that only supports
/// full-clear. Strictly ordered: clear, replay the remaining entries
/// (partial failure allowed), persist the remaining set regardless.
pub async fn remove(state: &SyncState, rule_key: &str) -> Result<ReplayOutcome, SyncError> {
    let engine = Arc::clone(&state.engine);
    adapter::tracked(&state.status, move |done| engine.clear_all(done)).await?;

    let remaining = without_key(&state.mirror.snapshot(), rule_key);
    let outcome = replay(state, &remaining).await;
    if !outcome.fully_applied() {
        tracing::warn!(
            "Replay after removing {rule_key} left {} rules unapplied; keeping them in canonical state",
            outcome.failed.len()
        );
    }

    state.mirror.replace(remaining.clone());
    state
        .mirror
        .persist(&remaining, state.store.as_ref(), &state.status)
        .await?;
    tracing::info!("Removed rule {rule_key} ({} remaining)", remaining.len());
    Ok(outcome)
}

/// Replay every canonical rule into the engine, e.g. after a transient
/// failure or a fresh load. Never alters the canonical set.
pub async fn set_all(state: &SyncState) -> ReplayOutcome {
    let rules = state.mirror.snapshot();
    let outcome = replay(state, &rules).await;
    if outcome.fully_applied() {
        tracing::info!("Replayed all {} rules into the engine", outcome.attempted);
    } else {
        tracing::warn!(
            "Replay applied {}/{} rules",
            outcome.attempted - outcome.failed.len(),
            outcome.attempted
        );
    }
    outcome
}

/// Clear the engine, then persist an empty canonical set. A store failure is
/// reported and leaves the persisted value as it was.
pub async fn clear_all(state: &SyncState) -> Result<(), SyncError> {
    let engine = Arc::clone(&state.engine);
    adapter::tracked(&state.status, move |done| engine.clear_all(done)).await?;

    state.mirror.replace(RuleSet::new());
    let store = Arc::clone(&state.store);
    adapter::tracked(&state.status, move |done| store.clear(done)).await?;
    tracing::info!("Cleared all rules");
    Ok(())
}

/// Issue one engine set-call per entry, all started concurrently, each
/// settling independently (allow-partial-failure join).
async fn replay(state: &SyncState, rules: &RuleSet) -> ReplayOutcome {
    let keys: Vec<String> = rules.keys().cloned().collect();
    let calls: Vec<_> = rules
        .values()
        .cloned()
        .map(|rule| {
            let engine = Arc::clone(&state.engine);
            let status = &state.status;
            async move { adapter::tracked(status, move |done| engine.set(rule, done)).await }
        })
        .collect();

    let settled = adapter::join_settled(calls).await;
    replay_outcome(keys, &settled)
}
