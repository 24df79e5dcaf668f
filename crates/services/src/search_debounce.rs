use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Idle window before a search term takes effect.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Delivers only the latest search input once typing pauses.
///
/// Each `schedule` aborts the pending delivery and starts a new timer. Settled
/// terms arrive on the receiver returned by [`SearchDebouncer::new`].
pub struct SearchDebouncer {
    delay: Duration,
    tx: mpsc::UnboundedSender<String>,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            tx,
            pending: None,
        };
        (debouncer, rx)
    }

    /// Replace any pending term with `term`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn schedule(&mut self, term: impl Into<String>) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        let term = term.into();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver may be gone during shutdown.
            let _ = tx.send(term);
        }));
    }

    /// Drop the pending term, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, sleep};

    #[tokio::test(start_paused = true)]
    async fn only_latest_input_is_delivered() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(DEFAULT_SEARCH_DEBOUNCE);
        let start = Instant::now();

        debouncer.schedule("l");
        sleep(Duration::from_millis(100)).await;
        debouncer.schedule("lo");
        sleep(Duration::from_millis(100)).await;
        debouncer.schedule("lot");

        assert_eq!(rx.recv().await.as_deref(), Some("lot"));
        assert!(start.elapsed() >= Duration::from_millis(500));

        sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_arrives_before_the_idle_window() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(Duration::from_millis(300));
        debouncer.schedule("lotus");

        sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().ok().as_deref(), Some("lotus"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_term() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(DEFAULT_SEARCH_DEBOUNCE);
        debouncer.schedule("gone");
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_pauses_deliver_each_term() {
        let (mut debouncer, mut rx) = SearchDebouncer::new(DEFAULT_SEARCH_DEBOUNCE);
        debouncer.schedule("first");
        assert_eq!(rx.recv().await.as_deref(), Some("first"));
        debouncer.schedule("");
        assert_eq!(rx.recv().await.as_deref(), Some(""));
    }
}
