//! Last-request-wins result slot.
//!
//! Every request for a slot is issued through [`KeyedSlot::begin`], which
//! hands out a [`Ticket`]. A result is only committed if its ticket is still
//! the most recent one; anything older is discarded on arrival. This is the
//! logical cancellation used for every remote query in the workspace.

/// Proof of issue for one request. Only the latest ticket of a slot commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    seq: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
pub struct KeyedSlot<K, V> {
    next_seq: u64,
    latest: Option<Ticket<K>>,
    pending: bool,
    committed: Option<(Ticket<K>, V)>,
}

impl<K, V> Default for KeyedSlot<K, V> {
    fn default() -> Self {
        Self {
            next_seq: 1,
            latest: None,
            pending: false,
            committed: None,
        }
    }
}

impl<K: Clone + PartialEq, V> KeyedSlot<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new request for `key`, superseding every earlier ticket.
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        let ticket = Ticket {
            key,
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        self.latest = Some(ticket.clone());
        self.pending = true;
        ticket
    }

    /// Commits `value` if `ticket` is the latest one issued.
    ///
    /// Returns `false` (and drops the value) for superseded tickets.
    pub fn commit(&mut self, ticket: Ticket<K>, value: V) -> bool {
        if self.latest.as_ref() != Some(&ticket) {
            return false;
        }
        self.pending = false;
        self.committed = Some((ticket, value));
        true
    }

    /// Forgets the latest request and its result. In-flight tickets become
    /// stale.
    pub fn clear(&mut self) {
        self.latest = None;
        self.pending = false;
        self.committed = None;
    }

    /// `true` while the latest request has not produced a result yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn latest_key(&self) -> Option<&K> {
        self.latest.as_ref().map(|t| &t.key)
    }

    /// Result of the latest request, if it has arrived.
    pub fn current(&self) -> Option<&V> {
        match (&self.latest, &self.committed) {
            (Some(latest), Some((ticket, value))) if latest == ticket => Some(value),
            _ => None,
        }
    }

    /// Most recently committed result, even if a newer request is pending.
    pub fn last_committed(&self) -> Option<(&K, &V)> {
        self.committed.as_ref().map(|(t, v)| (&t.key, v))
    }
}
