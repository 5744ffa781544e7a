//! Background service lifecycle management.
//!
//! `BackgroundServices` owns the tasks spawned at bootstrap, currently the
//! store change listener that keeps the mirror fresh while other replicas
//! write.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config;
use crate::ops::SyncState;

/// Manages the background tasks spawned during bootstrap.
pub struct BackgroundServices;

impl BackgroundServices {
    /// Start all background services.
    pub fn start(state: &Arc<SyncState>) -> JoinHandle<()> {
        Self::start_change_listener(Arc::clone(state))
    }

    /// Listen to the store's change feed and replace the mirror wholesale on
    /// every change to the rules entry, from this or any other replica.
    /// Last writer wins; there is no merge with local in-flight state.
    fn start_change_listener(state: Arc<SyncState>) -> JoinHandle<()> {
        let mut feed = state.store.subscribe();
        tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(change) if change.key == config::RULES_STORE_KEY => {
                        state.mirror.apply_external_change(change.new_value);
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "Change feed lagged by {skipped} events; reloading from store"
                        );
                        if let Err(e) = state.mirror.load(state.store.as_ref(), &state.status).await
                        {
                            tracing::warn!("Reload after lag failed: {e}");
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Change feed closed; listener stopping");
                        break;
                    }
                }
            }
        })
    }
}
