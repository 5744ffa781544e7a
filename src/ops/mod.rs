//! Reconciliation operations, organized by concern.
//!
//! - `rules`: the four operations (add/remove/set-all/clear-all)
//! - `logic`: pure helpers (unit-testable without a runtime)
//! - `state`: shared `SyncState` definition

mod logic;
mod rules;
mod state;

pub use logic::ReplayOutcome;
pub use rules::{add_or_replace, clear_all, remove, set_all};
pub use state::SyncState;
