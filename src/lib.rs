//! rulesync keeps a user-editable set of pattern-keyed rules consistent
//! between two external systems: a live rule engine that only supports
//! "set one rule" and "clear all rules", and a synchronized key-value store
//! that persists the full rule set and replicates it across devices.
//!
//! The canonical rule set lives in the store; the engine's live state is a
//! derived, rebuildable projection of it. Selective removal is reconciled
//! with a clear-then-replay pass that never drops a rule from canonical
//! state because of a transient engine failure.

pub mod adapter;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod ops;
pub mod services;
pub mod status;
pub mod store;

use std::sync::Arc;

use tokio::task::JoinHandle;

pub use crate::core::{Rule, RuleSet, RuleSetting, StoreMirror};
pub use crate::engine::{LocalRuleEngine, RuleEngine};
pub use crate::error::SyncError;
pub use crate::ops::{add_or_replace, clear_all, remove, set_all, ReplayOutcome, SyncState};
pub use crate::status::StatusReporter;
pub use crate::store::{MemoryStore, SqliteStore, StoreChange, SyncedStore};

/// Install the panic hook and tracing subscriber. Call once at process start.
pub fn init_telemetry() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("PANIC in rulesync: {info}");
        default_hook(info);
    }));

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rulesync=info".into()),
        )
        .init();
}

/// Wire up the shared state, load the mirror from the store, start the
/// change listener, and project canonical truth into the engine.
pub async fn bootstrap(
    engine: Arc<dyn RuleEngine>,
    store: Arc<dyn SyncedStore>,
) -> Result<(Arc<SyncState>, JoinHandle<()>), SyncError> {
    let state = Arc::new(SyncState::new(engine, store));

    state
        .mirror
        .load(state.store.as_ref(), &state.status)
        .await?;
    let services = services::BackgroundServices::start(&state);

    let outcome = ops::set_all(&state).await;
    if !outcome.fully_applied() {
        tracing::warn!(
            "Initial replay left {} rules unapplied; canonical state retains them",
            outcome.failed.len()
        );
    }

    Ok((state, services))
}
