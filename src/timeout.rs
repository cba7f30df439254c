/*!
 * General-purpose wall-clock deadlines.
 *
 * Two flavors: async operations are raced against a tokio timer and cancelled
 * at their next suspension point; blocking operations run on a detached
 * thread that is abandoned (not killed) when the deadline elapses.
 */

use std::future::Future;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::errors::TranslationError;

/// Run a future under a wall-clock deadline.
///
/// On elapse the future is dropped, which cancels it at its next await point.
pub async fn with_timeout<F, T>(limit: Duration, operation: F) -> Result<T, TranslationError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| TranslationError::Timeout(limit))
}

/// Run a blocking closure under a wall-clock deadline.
///
/// The closure runs on a detached background thread. If it overruns the
/// deadline the thread keeps running to completion unobserved and the caller
/// gets a timeout error; the sender side of the channel is simply dropped.
pub fn run_blocking_with_timeout<F, T>(limit: Duration, operation: F) -> Result<T, TranslationError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(operation());
    });

    rx.recv_timeout(limit)
        .map_err(|_| TranslationError::Timeout(limit))
}
