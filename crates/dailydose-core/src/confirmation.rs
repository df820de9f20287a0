//! Auto-closing decision confirmation.
//!
//! Purely presentational: the decision is already persisted before the
//! timer starts, so cancelling or losing it never affects state.

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Delayed callback that can be dismissed before it fires.
///
/// Must be scheduled from inside a tokio runtime.
#[derive(Debug)]
pub struct ConfirmationTimer {
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<bool>,
}

impl ConfirmationTimer {
    /// Run `on_close` after `delay` unless dismissed first.
    pub fn schedule<F>(delay: Duration, on_close: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (cancel, cancelled) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    on_close();
                    true
                }
                _ = cancelled => false,
            }
        });
        Self {
            cancel: Some(cancel),
            handle,
        }
    }

    /// Hold until the timer closes on its own or `dismissed` resolves first.
    ///
    /// Returns `true` if the timer closed on its own.
    pub async fn close_on<D: Future>(delay: Duration, dismissed: D) -> bool {
        let (closed_tx, closed) = oneshot::channel::<()>();
        let mut timer = Self::schedule(delay, move || {
            let _ = closed_tx.send(());
        });
        tokio::select! {
            _ = dismissed => timer.dismiss(),
            _ = closed => {}
        }
        timer.wait().await
    }

    /// Manual dismissal. The callback will not run if it has not already.
    pub fn dismiss(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the timer to settle. Returns `true` if the callback fired.
    pub async fn wait(self) -> bool {
        // Keep the sender alive until the task settles; dropping it would
        // read as a dismissal.
        let _cancel = self.cancel;
        self.handle.await.unwrap_or(false)
    }
}
