//! Cancellable "run once things settle" scheduling.
//!
//! A [`Debouncer`] owns at most one pending timer. Scheduling again aborts the
//! pending timer and issues a new generation number; the receiver checks
//! [`Debouncer::is_current`] so a notification that was already queued before
//! the cancellation is ignored too.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default settle window for directory search input.
pub const SEARCH_SETTLE: Duration = Duration::from_millis(300);

pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `make_event(generation)` to be sent on `tx` once the settle
    /// window elapses, replacing whatever was pending.
    pub fn schedule<E, F>(&mut self, tx: &mpsc::UnboundedSender<E>, make_event: F) -> u64
    where
        E: Send + 'static,
        F: FnOnce(u64) -> E + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let delay = self.delay;
        let tx = tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(make_event(generation));
        }));
        generation
    }

    /// Drop the pending timer, if any. Already-delivered notifications are
    /// invalidated as well because the generation moves on.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            self.generation += 1;
        }
    }

    /// Whether a notification carrying `generation` is still wanted. Returns
    /// true at most once per scheduled generation.
    pub fn is_current(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.pending.is_some() {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
