use std::fmt::Debug;
use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tracing::debug;

use crate::keyed::{KeyedSlot, Ticket};

/// Outcome of one finished request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The result belonged to the latest request and is now visible.
    Applied,
    /// The result belonged to a superseded request and was dropped.
    Discarded,
}

/// A [`KeyedSlot`] that also owns its in-flight requests.
///
/// Requests are polled by whoever awaits [`KeyedTask::next_completion`], so
/// several tasks can be driven from one event loop without spawning. Nothing
/// is ever aborted; superseded results simply fail the ticket check.
pub struct KeyedTask<K, V> {
    label: &'static str,
    slot: KeyedSlot<K, V>,
    in_flight: FuturesUnordered<BoxFuture<'static, (Ticket<K>, V)>>,
}

impl<K, V> KeyedTask<K, V>
where
    K: Clone + PartialEq + Debug + Send + 'static,
    V: Send + 'static,
{
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            slot: KeyedSlot::new(),
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Issues a request for `key`; every earlier request becomes stale.
    pub fn issue<F>(&mut self, key: K, request: F) -> Ticket<K>
    where
        F: Future<Output = V> + Send + 'static,
    {
        let ticket = self.slot.begin(key);
        debug!(task = self.label, key = ?ticket.key(), seq = ticket.seq(), "request issued");
        let tagged = ticket.clone();
        self.in_flight.push(async move { (tagged, request.await) }.boxed());
        ticket
    }

    /// Drops the current key and result; pending responses will be discarded.
    pub fn clear(&mut self) {
        self.slot.clear();
    }

    /// `true` while any request (current or stale) has not returned yet.
    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }

    pub fn latest_key(&self) -> Option<&K> {
        self.slot.latest_key()
    }

    pub fn current(&self) -> Option<&V> {
        self.slot.current()
    }

    pub fn last_committed(&self) -> Option<(&K, &V)> {
        self.slot.last_committed()
    }

    /// Waits for the next request to finish and commits it if still current.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let (ticket, value) = self.in_flight.next().await?;
        let seq = ticket.seq();
        if self.slot.commit(ticket, value) {
            Some(Completion::Applied)
        } else {
            debug!(task = self.label, seq, "stale response discarded");
            Some(Completion::Discarded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Completion, KeyedTask};
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn slow_superseded_response_is_discarded() {
        let mut task: KeyedTask<&'static str, u32> = KeyedTask::new("test");
        task.issue("pari", async {
            sleep(Duration::from_millis(500)).await;
            1
        });
        task.issue("paris", async {
            sleep(Duration::from_millis(10)).await;
            2
        });

        assert_eq!(task.next_completion().await, Some(Completion::Applied));
        assert_eq!(task.current(), Some(&2));

        assert_eq!(task.next_completion().await, Some(Completion::Discarded));
        assert_eq!(task.current(), Some(&2));
        assert_eq!(task.latest_key(), Some(&"paris"));
        assert_eq!(task.next_completion().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn first_response_does_not_win_over_latest_request() {
        let mut task: KeyedTask<u32, &'static str> = KeyedTask::new("test");
        task.issue(1, async { "old" });
        task.issue(2, async {
            sleep(Duration::from_millis(50)).await;
            "new"
        });

        assert_eq!(task.next_completion().await, Some(Completion::Discarded));
        assert!(task.is_pending());
        assert_eq!(task.current(), None);
        assert_eq!(task.next_completion().await, Some(Completion::Applied));
        assert_eq!(task.current(), Some(&"new"));
    }

    #[tokio::test]
    async fn clear_discards_in_flight() {
        let mut task: KeyedTask<u8, u8> = KeyedTask::new("test");
        task.issue(1, async { 1 });
        task.clear();
        assert!(task.has_in_flight());
        assert_eq!(task.next_completion().await, Some(Completion::Discarded));
        assert!(!task.has_in_flight());
        assert_eq!(task.current(), None);
    }
}
