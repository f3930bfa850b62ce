//! Stale-response suppression for async fetches.
//!
//! Every request takes a ticket carrying a monotonically increasing sequence
//! number and the identifier it targets. A response may only be applied while
//! its ticket is still the newest one handed out for that resource.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    seq: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTracker<K> {
    next_seq: u64,
    latest: Option<Ticket<K>>,
}

impl<K> Default for RequestTracker<K> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            latest: None,
        }
    }
}

impl<K: Clone + PartialEq> RequestTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `key`, superseding any outstanding one.
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.next_seq += 1;
        let ticket = Ticket {
            seq: self.next_seq,
            key,
        };
        self.latest = Some(ticket.clone());
        ticket
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        self.latest.as_ref() == Some(ticket)
    }

    /// Drop interest in whatever is outstanding.
    pub fn invalidate(&mut self) {
        self.latest = None;
    }

    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    /// Mark `ticket` as answered. Returns false for stale tickets.
    pub fn complete(&mut self, ticket: &Ticket<K>) -> bool {
        if self.is_current(ticket) {
            self.latest = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_request_supersedes_older() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(3u32);
        let second = tracker.begin(4u32);

        assert!(!tracker.is_current(&first));
        assert!(!tracker.complete(&first));
        assert!(tracker.complete(&second));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn same_key_requests_are_still_ordered() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin(7u32);
        let second = tracker.begin(7u32);
        assert_eq!(first.key(), second.key());
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
    }

    #[test]
    fn completed_ticket_cannot_land_twice() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.begin(());
        assert!(tracker.complete(&ticket));
        assert!(!tracker.complete(&ticket));
    }

    #[test]
    fn invalidate_discards_outstanding() {
        let mut tracker = RequestTracker::new();
        let ticket = tracker.begin("albums");
        tracker.invalidate();
        assert!(!tracker.complete(&ticket));
    }
}
