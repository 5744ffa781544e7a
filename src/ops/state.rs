//! Shared reconciliation state threaded through all operations.

use std::sync::Arc;

use crate::core::StoreMirror;
use crate::engine::RuleEngine;
use crate::status::StatusReporter;
use crate::store::SyncedStore;

/// Everything an operation needs: the two external collaborators, the
/// canonical mirror, and the status reporter. Callers hold this in an `Arc`
/// and thread it through; there is no ambient global state.
pub struct SyncState {
    pub engine: Arc<dyn RuleEngine>,
    pub store: Arc<dyn SyncedStore>,
    pub mirror: Arc<StoreMirror>,
    pub status: StatusReporter,
}

impl SyncState {
    pub fn new(engine: Arc<dyn RuleEngine>, store: Arc<dyn SyncedStore>) -> Self {
        Self {
            engine,
            store,
            mirror: Arc::new(StoreMirror::new()),
            status: StatusReporter::new(),
        }
    }
}
