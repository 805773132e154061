//! Debounced input

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delivers the last pushed value once `delay` has passed without a new push.
///
/// Each push cancels the pending timer and starts a new one; values are
/// never queued. The timer dies with the debouncer.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                tx,
                pending: None,
            },
            rx,
        )
    }

    pub fn push(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(value).is_err() {
                tracing::debug!("Debounced value dropped, receiver is gone");
            }
        }));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
