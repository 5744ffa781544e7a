//! Outcome reporting for adapted external calls.
//!
//! The reporter holds the outcome of the most recent call on a watch channel:
//! an empty string after a success, the error's display text after a failure.
//! Prior values are overwritten, never queued. Purely diagnostic; it has no
//! influence on operation control flow.

use tokio::sync::watch;

use crate::error::SyncError;

/// Publishes the outcome of the most recently settled external call.
pub struct StatusReporter {
    latest: watch::Sender<String>,
}

impl StatusReporter {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(String::new());
        Self { latest }
    }

    /// Record a settled call outcome, overwriting the previous one.
    pub fn record<T>(&self, outcome: &Result<T, SyncError>) {
        let message = match outcome {
            Ok(_) => String::new(),
            Err(err) => err.to_string(),
        };
        self.latest.send_replace(message);
    }

    /// The most recent message: empty on success, error text on failure.
    pub fn message(&self) -> String {
        self.latest.borrow().clone()
    }

    /// Subscribe to status changes, e.g. to drive a display element.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.latest.subscribe()
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}
