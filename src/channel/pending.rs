//! Per-domain FIFO buffer for actions published before a consumer mounts.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::command::types::Action;
use crate::types::Domain;

/// An undelivered action plus the moment it was buffered, so the retention
/// window can be enforced against wall-clock time at replay.
#[derive(Debug)]
pub(crate) struct PendingEntry {
    pub action: Action,
    pub buffered_at: Instant,
}

/// Ordered buffers of undelivered actions, keyed by domain.
///
/// Owned exclusively by the channel; entries leave either by replay when a
/// consumer registers or by expiring past the retention window.
#[derive(Debug, Default)]
pub(crate) struct PendingQueue {
    entries: HashMap<Domain, VecDeque<PendingEntry>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.entries
            .entry(action.domain)
            .or_default()
            .push_back(PendingEntry { action, buffered_at: Instant::now() });
    }

    /// Remove and return every buffered entry for `domain`, oldest first.
    pub fn drain(&mut self, domain: Domain) -> VecDeque<PendingEntry> {
        self.entries.remove(&domain).unwrap_or_default()
    }

    /// Drop entries for `domain` older than `retention`. Returns how many
    /// were discarded. Called lazily on publish since there is no
    /// background task in the single-threaded model.
    pub fn sweep(&mut self, domain: Domain, retention: Duration) -> usize {
        let Some(queue) = self.entries.get_mut(&domain) else {
            return 0;
        };
        let before = queue.len();
        queue.retain(|entry| entry.buffered_at.elapsed() <= retention);
        before - queue.len()
    }

    pub fn len(&self, domain: Domain) -> usize {
        self.entries.get(&domain).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::types::{ActionPayload, DateRange, NavigationTarget};

    fn date_action(range: DateRange) -> Action {
        Action::new(ActionPayload::SetDateRange(range))
    }

    #[test]
    fn drain_preserves_publish_order() {
        let mut queue = PendingQueue::new();
        let first = date_action(DateRange::Today);
        let second = date_action(DateRange::All);
        queue.push(first.clone());
        queue.push(second.clone());

        let drained = queue.drain(Domain::DateRange);
        let ids: Vec<_> = drained.iter().map(|e| e.action.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(queue.len(Domain::DateRange), 0);
    }

    #[test]
    fn domains_are_isolated() {
        let mut queue = PendingQueue::new();
        queue.push(date_action(DateRange::Today));
        queue.push(Action::new(ActionPayload::Navigate(NavigationTarget::Trades)));

        assert_eq!(queue.len(Domain::DateRange), 1);
        assert_eq!(queue.len(Domain::Navigation), 1);
        assert_eq!(queue.len(Domain::DisplayMode), 0);

        queue.drain(Domain::DateRange);
        assert_eq!(queue.len(Domain::Navigation), 1);
    }

    #[test]
    fn sweep_drops_only_expired_entries() {
        let mut queue = PendingQueue::new();
        queue.push(date_action(DateRange::Today));
        std::thread::sleep(Duration::from_millis(25));
        queue.push(date_action(DateRange::All));

        let dropped = queue.sweep(Domain::DateRange, Duration::from_millis(10));
        assert_eq!(dropped, 1);
        assert_eq!(queue.len(Domain::DateRange), 1);
    }

    #[test]
    fn sweep_on_empty_domain_is_a_no_op() {
        let mut queue = PendingQueue::new();
        assert_eq!(queue.sweep(Domain::Navigation, Duration::from_secs(1)), 0);
    }
}
