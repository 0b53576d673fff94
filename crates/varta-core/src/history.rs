//! Guard against stale chat-history responses.
//!
//! Typing a phone number fires one history fetch per keystroke once the
//! number is long enough. Responses can arrive out of order, so each fetch
//! takes a [`HistoryTicket`] and its result is applied only while that
//! ticket is still the latest one issued.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Issues tickets for history fetches. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct HistoryGuard {
    latest: Arc<AtomicU64>,
}

/// Proof that a fetch was started; see [`HistoryGuard::is_current`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryTicket(u64);

impl HistoryGuard {
    /// Creates a guard with no tickets issued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, invalidating every earlier one.
    #[must_use]
    pub fn issue(&self) -> HistoryTicket {
        HistoryTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Invalidates every outstanding ticket, e.g. when the phone is cleared.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns true if `ticket` is the most recent one issued.
    #[must_use]
    pub fn is_current(&self, ticket: HistoryTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Runs `fetch` under a fresh ticket.
    ///
    /// Returns `None` when a newer fetch started (or the guard was
    /// invalidated) before this one finished.
    pub async fn fetch_latest<F, T>(&self, fetch: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.issue();
        let value = fetch.await;
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!("Discarding stale history response");
            None
        }
    }
}

/// Number to reload after a message to `sent_to` went out.
///
/// Returns `None` when the operator moved on to another number while the
/// send was in flight; that number's own fetch is already running and must
/// not be superseded.
#[must_use]
pub fn reload_after_send(sent_to: &str, current: &str) -> Option<String> {
    let current = current.trim();
    (sent_to.trim() == current).then(|| current.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[test]
    fn newer_ticket_supersedes_older() {
        let guard = HistoryGuard::new();
        let first = guard.issue();
        assert!(guard.is_current(first));

        let second = guard.issue();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));

        guard.invalidate();
        assert!(!guard.is_current(second));
    }

    #[tokio::test]
    async fn slow_stale_response_is_dropped() {
        let guard = HistoryGuard::new();
        let (tx, rx) = oneshot::channel::<&str>();

        let slow = {
            let guard = guard.clone();
            tokio::spawn(async move { guard.fetch_latest(async { rx.await.unwrap() }).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let fast = guard.fetch_latest(async { "new number" }).await;
        tx.send("old number").unwrap();

        assert_eq!(fast, Some("new number"));
        assert_eq!(slow.await.unwrap(), None);
    }

    #[test]
    fn reload_only_for_unchanged_number() {
        assert_eq!(
            reload_after_send("919876543210", " 919876543210 "),
            Some("919876543210".to_string())
        );
        assert_eq!(reload_after_send("919876543210", "918888888888"), None);
        assert_eq!(reload_after_send("919876543210", ""), None);
    }

    #[tokio::test]
    async fn switching_number_mid_send_keeps_new_history() {
        let guard = HistoryGuard::new();
        let (tx, rx) = oneshot::channel::<&str>();

        // Operator switched to B while the message to A was in flight.
        let fetch_b = {
            let guard = guard.clone();
            tokio::spawn(async move { guard.fetch_latest(async { rx.await.unwrap() }).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let reloaded = match reload_after_send("A", "B") {
            Some(number) => guard.fetch_latest(async move { number }).await,
            None => None,
        };
        tx.send("history of B").unwrap();

        assert_eq!(reloaded, None);
        assert_eq!(fetch_b.await.unwrap(), Some("history of B"));
    }
}
