use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// The deadline passed before the operation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation did not finish within {0:?}")]
pub struct Elapsed(pub Duration);

/// Runs a blocking operation, giving up after `limit`.
///
/// With no limit the operation runs on the calling thread. Otherwise it runs
/// on a helper thread; if the deadline passes the helper is abandoned and
/// keeps running until the underlying call returns. A panic inside the
/// operation is propagated to the caller.
///
/// # Errors
///
/// Returns [`Elapsed`] if the operation did not complete in time.
pub fn run_with_timeout<T, F>(limit: Option<Duration>, op: F) -> Result<T, Elapsed>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let Some(limit) = limit else {
        return Ok(op());
    };

    let (tx, rx) = mpsc::sync_channel(1);
    let handle = thread::spawn(move || {
        // Receiver may be gone after a timeout
        let _ = tx.send(op());
    });

    match rx.recv_timeout(limit) {
        Ok(value) => Ok(value),
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(?limit, "blocking operation timed out");
            Err(Elapsed(limit))
        }
        Err(RecvTimeoutError::Disconnected) => match handle.join() {
            Err(payload) => std::panic::resume_unwind(payload),
            // Sender dropped without sending only happens on panic
            Ok(()) => Err(Elapsed(limit)),
        },
    }
}
