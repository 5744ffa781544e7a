//! Bridges callback-terminated external operations into awaitable calls.
//!
//! External collaborators signal completion through a single callback. The
//! adapter hands them a completion that forwards into a oneshot channel, so
//! callers can await the outcome like any other future. No retry, no timeout:
//! every issued call runs to completion, and recovery from transient failures
//! is structural (canonical state keeps the target, a later replay
//! re-establishes it).

use std::future::Future;

use tokio::sync::oneshot;

use crate::error::SyncError;
use crate::status::StatusReporter;

/// Completion callback handed to an external operation. Fires exactly once
/// with the operation's outcome.
pub type Completion<T> = Box<dyn FnOnce(Result<T, SyncError>) + Send + 'static>;

/// Run a callback-terminated operation and await its outcome.
///
/// `call` receives the completion to pass into the external operation. A
/// completion dropped without firing settles as an [`SyncError::Adapter`]
/// error rather than hanging the caller.
pub async fn adapted<T, F>(call: F) -> Result<T, SyncError>
where
    T: Send + 'static,
    F: FnOnce(Completion<T>),
{
    let (tx, rx) = oneshot::channel();
    call(Box::new(move |outcome| {
        let _ = tx.send(outcome);
    }));

    match rx.await {
        Ok(outcome) => outcome,
        Err(_) => Err(SyncError::Adapter(
            "completion callback dropped before settling".into(),
        )),
    }
}

/// [`adapted`] plus exactly one status update after the call settles.
///
/// The status hook belongs to the caller, not the adapter; this wrapper is how
/// every caller in the crate applies it.
pub async fn tracked<T, F>(status: &StatusReporter, call: F) -> Result<T, SyncError>
where
    T: Send + 'static,
    F: FnOnce(Completion<T>),
{
    let outcome = adapted(call).await;
    status.record(&outcome);
    outcome
}

/// Wait for every call to settle and return the per-call outcomes in order.
///
/// One call failing never aborts the others; this is the allow-partial-failure
/// join used by replay phases.
pub async fn join_settled<T, Fut>(calls: Vec<Fut>) -> Vec<Result<T, SyncError>>
where
    Fut: Future<Output = Result<T, SyncError>>,
{
    futures::future::join_all(calls).await
}
